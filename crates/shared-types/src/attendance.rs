use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Courses below this present percentage are flagged as low attendance.
pub const LOW_ATTENDANCE_THRESHOLD: i64 = 75;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
        AttendanceStatus::Excused,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "late" => Some(AttendanceStatus::Late),
            "excused" => Some(AttendanceStatus::Excused),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Excused => "Excused",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student's attendance in one course on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    pub fn status(&self) -> Option<AttendanceStatus> {
        AttendanceStatus::parse(&self.status)
    }
}

/// One line of a class roll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /api/attendance`: the roll for one course on one date.
/// Re-recording a student for the same date replaces the earlier status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
#[serde(rename_all = "camelCase")]
pub struct RecordAttendanceRequest {
    pub course_id: i64,
    pub date: NaiveDate,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Mark at least one student"))
    )]
    pub records: Vec<AttendanceEntry>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// present / (present + absent) × 100, rounded to the nearest integer.
/// Late and excused marks are not counted. Zero counted records yield 0.
pub fn present_percentage(present: i64, absent: i64) -> i64 {
    let counted = present + absent;
    if counted <= 0 {
        return 0;
    }
    ((present as f64 / counted as f64) * 100.0).round() as i64
}

/// Status tallies for one course.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CourseAttendanceCounts {
    pub course_id: i64,
    pub course_name: String,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
}

impl CourseAttendanceCounts {
    pub fn present_percentage(&self) -> i64 {
        present_percentage(self.present, self.absent)
    }

    fn has_counted_records(&self) -> bool {
        self.present + self.absent > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LowAttendanceClass {
    pub course_id: i64,
    pub course_name: String,
    pub present_percentage: i64,
}

/// Response of `GET /api/stats/attendance`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub present_percentage: i64,
    pub present_count: i64,
    pub absent_count: i64,
    #[serde(default)]
    pub late_count: i64,
    #[serde(default)]
    pub excused_count: i64,
    #[serde(default)]
    pub low_attendance_classes: Vec<LowAttendanceClass>,
}

impl AttendanceStats {
    /// Fold per-course tallies into overall figures plus the courses
    /// under [`LOW_ATTENDANCE_THRESHOLD`], weakest first.
    pub fn from_courses(courses: &[CourseAttendanceCounts]) -> Self {
        let mut stats = AttendanceStats::default();
        for c in courses {
            stats.present_count += c.present;
            stats.absent_count += c.absent;
            stats.late_count += c.late;
            stats.excused_count += c.excused;
        }
        stats.present_percentage = present_percentage(stats.present_count, stats.absent_count);

        let mut low: Vec<LowAttendanceClass> = courses
            .iter()
            .filter(|c| c.has_counted_records())
            .filter(|c| c.present_percentage() < LOW_ATTENDANCE_THRESHOLD)
            .map(|c| LowAttendanceClass {
                course_id: c.course_id,
                course_name: c.course_name.clone(),
                present_percentage: c.present_percentage(),
            })
            .collect();
        low.sort_by(|a, b| {
            a.present_percentage
                .cmp(&b.present_percentage)
                .then_with(|| a.course_name.cmp(&b.course_name))
        });
        stats.low_attendance_classes = low;
        stats
    }

    /// Absent share of the counted marks; 0 when nothing was counted.
    pub fn absent_percentage(&self) -> i64 {
        if self.present_count + self.absent_count == 0 {
            return 0;
        }
        100 - self.present_percentage
    }

    pub fn has_records(&self) -> bool {
        self.present_count + self.absent_count + self.late_count + self.excused_count > 0
    }
}
