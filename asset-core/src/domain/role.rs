use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const SERVICE_ALL: &str = "SERVICE.ALL";
pub const MAINT_ALL: &str = "MAINT.ALL";
pub const ASSETS_VIEW: &str = "ASSETS.VIEW";
pub const ADMIN_ALL: &str = "ADMIN.ALL";

/// Which home flow a signed-in user lands in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ServiceEngineer,
    ServiceHead,
    Admin,
    #[default]
    Unassigned,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::ServiceEngineer => write!(f, "Service Engineer"),
            Role::ServiceHead => write!(f, "Service Head"),
            Role::Admin => write!(f, "Admin"),
            Role::Unassigned => write!(f, "Unassigned"),
        }
    }
}

/// Map granted permissions to a role.
///
/// Checked in priority order, so a user holding both `SERVICE.ALL` and
/// `ADMIN.ALL` is a Service Engineer.
pub fn resolve_role(permissions: &BTreeSet<String>) -> Role {
    let has = |p: &str| permissions.contains(p);

    if has(SERVICE_ALL) {
        Role::ServiceEngineer
    } else if has(MAINT_ALL) || has(ASSETS_VIEW) {
        Role::ServiceHead
    } else if has(ADMIN_ALL) {
        Role::Admin
    } else {
        Role::Unassigned
    }
}
