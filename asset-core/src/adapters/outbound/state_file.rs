use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

use crate::domain::{models::AppState, ports::outbound::StateStore, StoreError};

/// `AppState` as a JSON document on disk: `{"auth": {..}, "attendance": {..}}`.
///
/// The file carries the session token, so it is written owner-only on unix.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sibling file the next state is written to before it replaces `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `content` to a temp file, then rename it over `path`. A reader sees
/// either the previous state or the new one, never a truncated file.
fn secure_write(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);

    #[cfg(unix)]
    {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(&tmp, content)?;
    }

    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<AppState, StoreError> {
        if !self.path.exists() {
            return Ok(AppState::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(AppState::default());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(state)?;
        secure_write(&self.path, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        ActionType, AttendanceRecord, AuthSession, Coordinates, EmployeeId,
    };
    use time::macros::datetime;

    #[test]
    fn missing_file_loads_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("nested").join("state.json"));

        assert_eq!(store.load().unwrap(), AppState::default());
    }

    #[test]
    fn saved_state_survives_a_restart_under_auth_and_attendance_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = AppState::default();
        state.auth.sign_in(AuthSession {
            token: "tok".to_string(),
            employee_id: Some(EmployeeId::new("E-3")),
            display_name: None,
            permissions: ["ASSETS.VIEW".to_string()].into_iter().collect(),
        });
        state.attendance.enqueue(AttendanceRecord::capture(
            ActionType::Login,
            Coordinates::new(22.3, 91.8),
            state.auth.employee_id().cloned(),
            datetime!(2024-06-01 09:15:00 +6),
        ));
        state.attendance.set_last_action(ActionType::Login);

        FileStateStore::new(&path).save(&state).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["auth"]["token"], "tok");
        assert_eq!(raw["attendance"]["pending_queue"][0]["date"], "2024-06-01");

        let reloaded = FileStateStore::new(&path).load().unwrap();
        assert_eq!(reloaded, state);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            FileStateStore::new(&path).load(),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = FileStateStore::new(&path);

        let mut state = AppState::default();
        state.attendance.set_last_action(ActionType::Login);
        store.save(&state).unwrap();

        // A directory squatting on the temp path makes the next write fail.
        std::fs::create_dir(dir.path().join("state.json.tmp")).unwrap();
        state.attendance.set_last_action(ActionType::Logout);

        assert!(matches!(store.save(&state), Err(StoreError::Io(_))));
        assert_eq!(
            store.load().unwrap().attendance.last_action(),
            Some(ActionType::Login)
        );
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        FileStateStore::new(&path).save(&AppState::default()).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("state.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn state_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        FileStateStore::new(&path).save(&AppState::default()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
