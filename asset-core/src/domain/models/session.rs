use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::EmployeeId;
use crate::domain::{resolve_role, Role};

/// A freshly issued session, as returned by the sign-in endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub employee_id: Option<EmployeeId>,
    pub display_name: Option<String>,
    pub permissions: BTreeSet<String>,
}

/// Auth slice of the application state, persisted under `auth`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    employee_id: Option<EmployeeId>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    permissions: BTreeSet<String>,
    #[serde(default)]
    role: Role,
}

impl AuthState {
    pub fn sign_in(&mut self, session: AuthSession) {
        self.role = resolve_role(&session.permissions);
        self.token = Some(session.token);
        self.employee_id = session.employee_id;
        self.display_name = session.display_name;
        self.permissions = session.permissions;
    }

    pub fn sign_out(&mut self) {
        *self = Self::default();
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn employee_id(&self) -> Option<&EmployeeId> {
        self.employee_id.as_ref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
