use async_trait::async_trait;

use crate::domain::{
    models::{CompletionAck, CompletionSubmission, RatingCategory},
    GatewayError,
};

/// Outbound port for the maintenance rating endpoints.
#[async_trait]
pub trait RatingGateway: Send + Sync + 'static {
    /// Full category catalog, in display order.
    async fn fetch_categories(&self) -> Result<Vec<RatingCategory>, GatewayError>;

    async fn submit_completion(
        &self,
        submission: &CompletionSubmission,
    ) -> Result<CompletionAck, GatewayError>;
}
