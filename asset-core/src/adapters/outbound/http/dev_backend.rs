use std::sync::{Arc, Mutex};

use crate::domain::models::{
    AttendanceSubmission, AuthSession, CompletionSubmission, EmployeeId, RatingCategory,
    RatingSubCategory,
};
use crate::domain::{ADMIN_ALL, SERVICE_ALL};

/// In-memory stand-in for the API, used by `--dev`.
#[derive(Debug, Clone, Default)]
pub struct DevBackend {
    attendance: Arc<Mutex<Vec<AttendanceSubmission>>>,
    completions: Arc<Mutex<Vec<CompletionSubmission>>>,
}

impl DevBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, username: &str) -> AuthSession {
        let permissions = if username == "admin" {
            vec![ADMIN_ALL.to_string()]
        } else {
            vec![SERVICE_ALL.to_string()]
        };
        AuthSession {
            token: format!("dev-token-{}", username),
            employee_id: Some(EmployeeId::new("dev-1")),
            display_name: Some("Dev User".to_string()),
            permissions: permissions.into_iter().collect(),
        }
    }

    pub fn record_attendance(&self, submission: &AttendanceSubmission) {
        self.attendance
            .lock()
            .expect("dev store lock poisoned")
            .push(submission.clone());
    }

    pub fn record_completion(&self, submission: &CompletionSubmission) {
        self.completions
            .lock()
            .expect("dev store lock poisoned")
            .push(submission.clone());
    }

    pub fn attendance(&self) -> Vec<AttendanceSubmission> {
        self.attendance.lock().expect("dev store lock poisoned").clone()
    }

    pub fn completions(&self) -> Vec<CompletionSubmission> {
        self.completions.lock().expect("dev store lock poisoned").clone()
    }

    pub fn categories(&self) -> Vec<RatingCategory> {
        let sub = |id: i64, title: &str, weight: f64| RatingSubCategory {
            id,
            title: title.to_string(),
            weight_percentage: weight,
        };
        let category = |id: i64, title: &str, weight: f64, subs: Vec<RatingSubCategory>| {
            RatingCategory {
                id,
                title: title.to_string(),
                weight_percentage: weight,
                sub_categories: subs,
            }
        };

        vec![
            category(
                1,
                "Electrical",
                40.0,
                vec![
                    sub(101, "Wiring", 50.0),
                    sub(102, "Earthing", 30.0),
                    sub(103, "Panel labels", 20.0),
                ],
            ),
            category(
                2,
                "Mechanical",
                35.0,
                vec![sub(201, "Lubrication", 60.0), sub(202, "Belt tension", 40.0)],
            ),
            category(
                3,
                "Safety",
                25.0,
                vec![sub(301, "Guards", 70.0), sub(302, "Signage", 30.0)],
            ),
            category(4, "Response time", 20.0, vec![]),
            category(5, "Fix quality", 30.0, vec![]),
            category(6, "Site left clean", 15.0, vec![]),
            category(7, "Communication", 15.0, vec![]),
            category(8, "Parts logged", 10.0, vec![]),
            category(9, "Handover notes", 10.0, vec![]),
        ]
    }
}
