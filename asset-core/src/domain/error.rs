use thiserror::Error;

/// Errors returned by the outbound REST gateways.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("session expired or invalid")]
    Unauthorized,
    #[error("server returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("{0}")]
    Unknown(String),
}

impl GatewayError {
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}

/// The device could not produce a position fix.
#[derive(Debug, Error)]
#[error("location unavailable: {reason}")]
pub struct LocationError {
    pub reason: String,
}

impl LocationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors from reading or writing the on-device state file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot determine state directory")]
    NoStateDir,
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors that can occur while recording attendance.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),
    #[error("attendance rejected by server: {message}")]
    Rejected { message: String },
    #[error("no network connection")]
    Offline,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<LocationError> for AttendanceError {
    fn from(e: LocationError) -> Self {
        Self::LocationUnavailable(e.reason)
    }
}

/// Errors raised by the rating tree and the completion submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("unknown category {0}")]
    UnknownCategory(i64),
    #[error("unknown sub-category {sub_id} in category {category_id}")]
    UnknownSubCategory { category_id: i64, sub_id: i64 },
    #[error("category {0} is rated through its sub-categories")]
    HasSubCategories(i64),
    #[error("category {0} has no sub-categories")]
    NoSubCategories(i64),
    #[error("complete every section on this page first: {}", .titles.join(", "))]
    PageIncomplete { titles: Vec<String> },
    #[error("already on the last page")]
    NoMorePages,
    #[error("complete all sections before submitting: {}", .titles.join(", "))]
    Incomplete { titles: Vec<String> },
    #[error("could not load rating categories: {0}")]
    CatalogUnavailable(String),
    #[error("submission failed: {0}")]
    SubmissionRejected(String),
}

/// Errors from signing in or out.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Gateway(GatewayError),
}

impl From<GatewayError> for AuthError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Unauthorized => Self::InvalidCredentials,
            other => Self::Gateway(other),
        }
    }
}
