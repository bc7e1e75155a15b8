use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime};

use super::EmployeeId;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]:[second]");

/// A geographic position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Login,
    Logout,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Login => write!(f, "login"),
            ActionType::Logout => write!(f, "logout"),
        }
    }
}

/// One login/logout event, captured at the moment the user acted.
///
/// Records are immutable once built; the queue only ever appends them or
/// drops all of them at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    employee_id: Option<EmployeeId>,
    latitude: f64,
    longitude: f64,
    date: String,
    time: String,
    action_type: ActionType,
}

impl AttendanceRecord {
    /// Split `at` into local `YYYY-MM-DD` and `HH:MM:SS` parts.
    pub fn capture(
        action_type: ActionType,
        coordinates: Coordinates,
        employee_id: Option<EmployeeId>,
        at: OffsetDateTime,
    ) -> Self {
        Self {
            employee_id,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            date: at.format(DATE_FORMAT).unwrap_or_default(),
            time: at.format(TIME_FORMAT).unwrap_or_default(),
            action_type,
        }
    }

    pub fn employee_id(&self) -> Option<&EmployeeId> {
        self.employee_id.as_ref()
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    /// The `date_time` value sent to the attendance endpoint.
    pub fn date_time(&self) -> String {
        format!("{} {}", self.date, self.time)
    }

    pub fn to_submission(&self) -> AttendanceSubmission {
        AttendanceSubmission {
            coordinates: self.coordinates(),
            date_time: self.date_time(),
        }
    }
}

/// What the attendance endpoint receives for a single event.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceSubmission {
    pub coordinates: Coordinates,
    pub date_time: String,
}

/// The server's explicit verdict on an attendance submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceAck {
    Accepted,
    Rejected { message: String },
}

/// Result of a login/logout/flush call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceOutcome {
    /// The guard on `last_action` made the call a no-op.
    Skipped,
    Submitted,
    Queued,
    Flushed(usize),
}

/// Attendance slice of the application state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceState {
    #[serde(default)]
    pending_queue: Vec<AttendanceRecord>,
    #[serde(default)]
    last_action: Option<ActionType>,
}

impl AttendanceState {
    pub fn pending_queue(&self) -> &[AttendanceRecord] {
        &self.pending_queue
    }

    pub fn last_action(&self) -> Option<ActionType> {
        self.last_action
    }

    pub fn is_logged_in(&self) -> bool {
        self.last_action == Some(ActionType::Login)
    }

    pub fn enqueue(&mut self, record: AttendanceRecord) {
        self.pending_queue.push(record);
    }

    pub fn set_last_action(&mut self, action: ActionType) {
        self.last_action = Some(action);
    }

    pub fn clear_pending(&mut self) {
        self.pending_queue.clear();
    }
}
