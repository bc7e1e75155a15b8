use serde::{Deserialize, Serialize};

use crate::domain::models::{
    AttendanceAck, AttendanceSubmission, AuthSession, CompletionAck, EmployeeId,
};

#[derive(Serialize)]
pub struct AttendanceRequest<'a> {
    pub lat_lon: [f64; 2],
    pub date_time: &'a str,
}

impl<'a> From<&'a AttendanceSubmission> for AttendanceRequest<'a> {
    fn from(submission: &'a AttendanceSubmission) -> Self {
        Self {
            lat_lon: [
                submission.coordinates.latitude,
                submission.coordinates.longitude,
            ],
            date_time: &submission.date_time,
        }
    }
}

#[derive(Deserialize)]
pub struct AttendanceResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<AttendanceResponse> for AttendanceAck {
    fn from(response: AttendanceResponse) -> Self {
        if response.success {
            AttendanceAck::Accepted
        } else {
            AttendanceAck::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| "attendance was not recorded".to_string()),
            }
        }
    }
}

#[derive(Serialize)]
pub struct SignInRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct SignInResponse {
    pub token: String,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl From<SignInResponse> for AuthSession {
    fn from(response: SignInResponse) -> Self {
        AuthSession {
            token: response.token,
            employee_id: response.employee_id.map(EmployeeId::new),
            display_name: response.name,
            permissions: response.permissions.into_iter().collect(),
        }
    }
}

/// `{"type": "successful" | <anything else>, "message": ..}`
#[derive(Deserialize)]
pub struct CompletionResponse {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<CompletionResponse> for CompletionAck {
    fn from(response: CompletionResponse) -> Self {
        if response.kind == "successful" {
            CompletionAck::Successful
        } else {
            CompletionAck::Rejected {
                message: response.message.unwrap_or(response.kind),
            }
        }
    }
}
