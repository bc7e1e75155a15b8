use serde::{Deserialize, Serialize};

use super::{AttendanceState, AuthState};

/// Everything the client keeps across restarts.
///
/// Passed explicitly to services; nothing reads it through a global.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub auth: AuthState,
    #[serde(default)]
    pub attendance: AttendanceState,
}
