//! Student model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Student record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub semester: String,
    /// School enrollment number
    pub control_number: Option<String>,
    pub major: String,
    pub created_at: DateTime<Utc>,
}

/// Create or replace student request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StudentInput {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Semester is required"))]
    pub semester: String,
    #[validate(length(min = 1, message = "Control number cannot be empty"))]
    pub control_number: Option<String>,
    #[validate(length(min = 1, message = "Major is required"))]
    pub major: String,
}

/// Free-text search parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Search term
    pub query: Option<String>,
}

impl SearchQuery {
    /// Trimmed, non-empty search term
    pub fn term(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}
