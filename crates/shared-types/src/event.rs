use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A school calendar event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    pub created_by_id: i64,
}

impl Event {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.end_date.unwrap_or(self.date) >= now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 200, message = "Title is required"))
    )]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

impl CreateEventRequest {
    pub fn check_dates(&self) -> Result<(), AppError> {
        match self.end_date {
            Some(end) if end < self.date => Err(AppError::field(
                "end_date",
                "An event cannot end before it starts",
            )),
            _ => Ok(()),
        }
    }
}
