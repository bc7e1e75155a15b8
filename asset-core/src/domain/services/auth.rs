use std::sync::Arc;

use crate::domain::{
    models::AppState,
    ports::outbound::{AuthGateway, StateStore},
    AuthError, Role,
};

/// Signs the user in and out, keeping the auth slice of `AppState` current.
pub struct AuthService<G> {
    gateway: Arc<G>,
    store: Option<Arc<dyn StateStore>>,
}

impl<G: AuthGateway> AuthService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Returns the role the new session resolves to.
    pub async fn sign_in(
        &self,
        state: &mut AppState,
        username: &str,
        password: &str,
    ) -> Result<Role, AuthError> {
        let session = self.gateway.sign_in(username, password).await?;
        state.auth.sign_in(session);
        tracing::info!(role = %state.auth.role(), "Signed in");
        self.persist(state);
        Ok(state.auth.role())
    }

    /// Forget the session. Queued attendance survives sign-out.
    pub fn sign_out(&self, state: &mut AppState) {
        state.auth.sign_out();
        tracing::info!("Signed out");
        self.persist(state);
    }

    fn persist(&self, state: &AppState) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(state) {
                tracing::error!("Failed to persist app state: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        mock::{MockAuthGateway, MockStateStore},
        models::{
            ActionType, AttendanceRecord, AuthSession, Coordinates, EmployeeId,
        },
    };
    use time::macros::datetime;

    fn session(perms: &[&str]) -> AuthSession {
        AuthSession {
            token: "secret".to_string(),
            employee_id: Some(EmployeeId::new("E-1")),
            display_name: Some("Field Engineer".to_string()),
            permissions: perms.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn sign_in_stores_session_and_role() {
        let store = Arc::new(MockStateStore::new());
        let service = AuthService::new(Arc::new(MockAuthGateway::accepting(session(&[
            "SERVICE.ALL",
        ]))))
        .with_store(store.clone());
        let mut state = AppState::default();

        let role = service.sign_in(&mut state, "eng", "pw").await.unwrap();

        assert_eq!(role, Role::ServiceEngineer);
        assert_eq!(state.auth.token(), Some("secret"));
        assert_eq!(store.saved(), Some(state));
    }

    #[tokio::test]
    async fn bad_credentials_leave_state_alone() {
        let service = AuthService::new(Arc::new(MockAuthGateway::refusing()));
        let mut state = AppState::default();

        let err = service.sign_in(&mut state, "eng", "nope").await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!state.auth.is_signed_in());
    }

    #[tokio::test]
    async fn sign_out_keeps_pending_attendance() {
        let service = AuthService::new(Arc::new(MockAuthGateway::accepting(session(&[
            "ADMIN.ALL",
        ]))));
        let mut state = AppState::default();
        service.sign_in(&mut state, "admin", "pw").await.unwrap();
        state.attendance.enqueue(AttendanceRecord::capture(
            ActionType::Login,
            Coordinates::new(0.0, 0.0),
            state.auth.employee_id().cloned(),
            datetime!(2024-01-01 09:00:00 UTC),
        ));

        service.sign_out(&mut state);

        assert!(!state.auth.is_signed_in());
        assert_eq!(state.attendance.pending_queue().len(), 1);
    }
}
