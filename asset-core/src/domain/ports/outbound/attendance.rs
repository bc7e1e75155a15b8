use async_trait::async_trait;

use crate::domain::{
    models::{AttendanceAck, AttendanceSubmission},
    GatewayError,
};

/// Outbound port for the attendance endpoint.
#[async_trait]
pub trait AttendanceGateway: Send + Sync + 'static {
    /// Send one login/logout event.
    ///
    /// `Ok(AttendanceAck::Rejected)` is the server saying no; `Err` is a
    /// transport or protocol failure.
    async fn submit_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<AttendanceAck, GatewayError>;
}
