use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::attendance::AttendanceStats;
use crate::course::Course;
use crate::memorization::{Memorization, MemorizationStats};
use crate::models::User;

/// Link between a parent account and a student account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ParentStudentRelation {
    pub id: i64,
    pub parent_id: i64,
    pub student_id: i64,
    pub relationship: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/parents/:parentId/students`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
#[serde(rename_all = "camelCase")]
pub struct LinkStudentRequest {
    pub student_id: i64,
    #[serde(default = "default_relationship")]
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 50, message = "Relationship is required"))
    )]
    pub relationship: String,
    #[serde(default)]
    pub is_primary: bool,
}

fn default_relationship() -> String {
    "parent".to_string()
}

/// One assignment from the student's courses and whether they turned it in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AssignmentProgress {
    pub assignment: Assignment,
    pub submitted: bool,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Headline figures of the parent progress widget.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub attendance_percentage: i64,
    pub memorization_completed: i64,
    pub memorization_total: i64,
    pub assignments_submitted: i64,
    pub assignments_total: i64,
}

impl ProgressSummary {
    pub fn new(
        attendance: &AttendanceStats,
        memorization: &[Memorization],
        assignments: &[AssignmentProgress],
    ) -> Self {
        let mem = MemorizationStats::from_entries(memorization);
        Self {
            attendance_percentage: attendance.present_percentage,
            memorization_completed: mem.completed_count,
            memorization_total: mem.total_count,
            assignments_submitted: assignments.iter().filter(|a| a.submitted).count() as i64,
            assignments_total: assignments.len() as i64,
        }
    }
}

/// Response of `GET /api/parent-portal/student/:studentId/progress`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    pub student: User,
    pub courses: Vec<Course>,
    pub attendance: AttendanceStats,
    pub memorization: Vec<Memorization>,
    pub assignments: Vec<AssignmentProgress>,
    pub summary: ProgressSummary,
}

impl StudentProgress {
    pub fn build(
        student: User,
        courses: Vec<Course>,
        attendance: AttendanceStats,
        memorization: Vec<Memorization>,
        assignments: Vec<AssignmentProgress>,
    ) -> Self {
        let summary = ProgressSummary::new(&attendance, &memorization, &assignments);
        Self {
            student,
            courses,
            attendance,
            memorization,
            assignments,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::CourseAttendanceCounts;
    use pretty_assertions::assert_eq;

    fn assignment(id: i64) -> Assignment {
        Assignment {
            id,
            course_id: 1,
            title: format!("Homework {id}"),
            description: None,
            due_date: None,
            total_points: 10,
            created_by: 2,
            created_at: Utc::now(),
        }
    }

    fn memo(id: i64, done: bool) -> Memorization {
        Memorization {
            id,
            student_id: 5,
            course_id: 1,
            surah: "An-Naba".into(),
            ayah_start: 1,
            ayah_end: 40,
            completion_date: None,
            progress: if done { 100 } else { 30 },
            is_completed: done,
        }
    }

    #[test]
    fn summary_counts_each_source() {
        let attendance = AttendanceStats::from_courses(&[CourseAttendanceCounts {
            course_id: 1,
            course_name: "Hifz".into(),
            present: 4,
            absent: 1,
            late: 2,
            excused: 0,
        }]);
        let assignments = vec![
            AssignmentProgress {
                assignment: assignment(1),
                submitted: true,
                submitted_at: Some(Utc::now()),
            },
            AssignmentProgress {
                assignment: assignment(2),
                submitted: false,
                submitted_at: None,
            },
        ];
        let summary =
            ProgressSummary::new(&attendance, &[memo(1, true), memo(2, false)], &assignments);
        assert_eq!(
            summary,
            ProgressSummary {
                attendance_percentage: 80,
                memorization_completed: 1,
                memorization_total: 2,
                assignments_submitted: 1,
                assignments_total: 2,
            }
        );
    }

    #[test]
    fn link_request_defaults_relationship() {
        let req: LinkStudentRequest = serde_json::from_str(r#"{"studentId": 9}"#).unwrap();
        assert_eq!(req.relationship, "parent");
        assert!(!req.is_primary);
    }
}
