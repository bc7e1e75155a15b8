use time::{OffsetDateTime, UtcOffset};

pub fn to_local_time(dt: OffsetDateTime) -> OffsetDateTime {
    if let Ok(local_offset) = UtcOffset::current_local_offset() {
        dt.to_offset(local_offset)
    } else {
        dt
    }
}

/// Current wall-clock time in the device's offset, or UTC when the offset
/// cannot be determined.
pub fn now_local() -> OffsetDateTime {
    to_local_time(OffsetDateTime::now_utc())
}
