use time::OffsetDateTime;

/// Source of the local wall-clock time stamped on attendance records.
pub trait Clock: Send + Sync + 'static {
    fn now_local(&self) -> OffsetDateTime;
}
