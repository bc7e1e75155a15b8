use async_trait::async_trait;

use crate::domain::{models::AuthSession, GatewayError};

#[async_trait]
pub trait AuthGateway: Send + Sync + 'static {
    /// Exchange credentials for a session. Bad credentials surface as
    /// `GatewayError::Unauthorized`.
    async fn sign_in(&self, username: &str, password: &str) -> Result<AuthSession, GatewayError>;
}
