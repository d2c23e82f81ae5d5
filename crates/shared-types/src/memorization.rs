use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Badge shown on an entry that is marked complete at full progress.
pub const COMPLETED_TAG: &str = "Completed";

/// One stretch of a surah a student is memorizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Memorization {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub surah: String,
    pub ayah_start: i32,
    pub ayah_end: i32,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    pub progress: i32,
    pub is_completed: bool,
}

impl Memorization {
    /// Progress clamped to 0..=100 for display.
    pub fn progress_percent(&self) -> i32 {
        self.progress.clamp(0, 100)
    }

    pub fn progress_label(&self) -> String {
        format!("{}%", self.progress_percent())
    }

    /// `Some("Completed")` once the entry is both flagged complete and at 100%.
    pub fn completion_tag(&self) -> Option<&'static str> {
        (self.is_completed && self.progress >= 100).then_some(COMPLETED_TAG)
    }

    pub fn ayah_range(&self) -> String {
        if self.ayah_start == self.ayah_end {
            format!("Ayah {}", self.ayah_start)
        } else {
            format!("Ayat {}-{}", self.ayah_start, self.ayah_end)
        }
    }
}

fn check_ayah_range(start: i32, end: i32) -> Result<(), AppError> {
    if start < 1 {
        return Err(AppError::field("ayah_start", "Ayah numbers start at 1"));
    }
    if end < start {
        return Err(AppError::field(
            "ayah_end",
            "Ending ayah cannot come before the starting ayah",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
#[serde(rename_all = "camelCase")]
pub struct CreateMemorizationRequest {
    pub student_id: i64,
    pub course_id: i64,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 100, message = "Surah is required"))
    )]
    pub surah: String,
    pub ayah_start: i32,
    pub ayah_end: i32,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))
    )]
    pub progress: i32,
    #[serde(default)]
    pub is_completed: bool,
}

impl CreateMemorizationRequest {
    pub fn check_ayahs(&self) -> Result<(), AppError> {
        check_ayah_range(self.ayah_start, self.ayah_end)
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemorizationRequest {
    #[serde(default)]
    pub surah: Option<String>,
    #[serde(default)]
    pub ayah_start: Option<i32>,
    #[serde(default)]
    pub ayah_end: Option<i32>,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))
    )]
    pub progress: Option<i32>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

impl UpdateMemorizationRequest {
    /// Apply onto the stored entry and re-check the ayah range of the result.
    pub fn apply(&self, current: &Memorization) -> Result<Memorization, AppError> {
        let mut next = current.clone();
        if let Some(surah) = &self.surah {
            if surah.trim().is_empty() {
                return Err(AppError::field("surah", "Surah is required"));
            }
            next.surah = surah.clone();
        }
        if let Some(start) = self.ayah_start {
            next.ayah_start = start;
        }
        if let Some(end) = self.ayah_end {
            next.ayah_end = end;
        }
        if self.completion_date.is_some() {
            next.completion_date = self.completion_date;
        }
        if let Some(progress) = self.progress {
            next.progress = progress;
        }
        if let Some(done) = self.is_completed {
            next.is_completed = done;
        }
        check_ayah_range(next.ayah_start, next.ayah_end)?;
        if !(0..=100).contains(&next.progress) {
            return Err(AppError::field("progress", "Progress must be between 0 and 100"));
        }
        Ok(next)
    }
}

/// Response of `GET /api/stats/memorization`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MemorizationStats {
    pub completed_count: i64,
    pub total_count: i64,
    pub average_progress: i64,
}

impl MemorizationStats {
    /// Completed entries are counted once per id; the average is rounded.
    pub fn from_entries(entries: &[Memorization]) -> Self {
        let mut seen = std::collections::HashSet::new();
        let unique: Vec<&Memorization> = entries.iter().filter(|m| seen.insert(m.id)).collect();
        if unique.is_empty() {
            return Self::default();
        }
        let completed = unique.iter().filter(|m| m.is_completed).count() as i64;
        let sum: i64 = unique.iter().map(|m| m.progress_percent() as i64).sum();
        let total = unique.len() as i64;
        Self {
            completed_count: completed,
            total_count: total,
            average_progress: (sum as f64 / total as f64).round() as i64,
        }
    }
}
