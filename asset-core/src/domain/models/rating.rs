use serde::{Deserialize, Serialize};

use super::MaintenanceId;

/// One of the three discrete values a ratable unit can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Rating {
    Poor,
    Fair,
    Good,
}

impl Rating {
    pub fn value(self) -> f64 {
        match self {
            Rating::Poor => 0.0,
            Rating::Fair => 2.5,
            Rating::Good => 5.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Poor => "Poor",
            Rating::Fair => "Fair",
            Rating::Good => "Good",
        }
    }
}

impl TryFrom<f64> for Rating {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value == 0.0 {
            Ok(Rating::Poor)
        } else if value == 2.5 {
            Ok(Rating::Fair)
        } else if value == 5.0 {
            Ok(Rating::Good)
        } else {
            Err(format!("invalid rating value {}, expected 0, 2.5 or 5", value))
        }
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which maintenance form is being completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormType {
    PreventiveMaintenance,
    Other(String),
}

impl FormType {
    /// Preventive forms rate through sub-categories; every other form rates
    /// categories directly.
    pub fn keeps(&self, category: &RatingCategory) -> bool {
        match self {
            FormType::PreventiveMaintenance => category.has_sub_categories(),
            FormType::Other(_) => !category.has_sub_categories(),
        }
    }
}

impl std::str::FromStr for FormType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "preventive_maintenance" => FormType::PreventiveMaintenance,
            other => FormType::Other(other.to_string()),
        })
    }
}

impl std::fmt::Display for FormType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormType::PreventiveMaintenance => write!(f, "preventive_maintenance"),
            FormType::Other(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSubCategory {
    pub id: i64,
    pub title: String,
    pub weight_percentage: f64,
}

/// A category from the rating catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingCategory {
    pub id: i64,
    pub title: String,
    pub weight_percentage: f64,
    #[serde(default)]
    pub sub_categories: Vec<RatingSubCategory>,
}

impl RatingCategory {
    pub fn has_sub_categories(&self) -> bool {
        !self.sub_categories.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedSubCategory {
    pub sub_id: i64,
    pub weight_percentage: f64,
    pub rating: Rating,
}

/// One `rating_data` item of the completion payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedCategory {
    pub category_id: i64,
    pub weight_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_categories: Option<Vec<RatedSubCategory>>,
}

/// Body of the maintenance completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionSubmission {
    pub temporary: bool,
    pub maintenance_id: MaintenanceId,
    pub rating_data: Vec<RatedCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionAck {
    Successful,
    Rejected { message: String },
}
