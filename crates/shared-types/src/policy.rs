//! Role policy: one table mapping each role to its landing route, its
//! navigation entries and the actions it may perform.
//!
//! The navigation shell, the route guard and the server's permission
//! extractors all read from this table, so a role's capabilities are
//! declared exactly once.

use serde::{Deserialize, Serialize};

use crate::models::UserRole;

/// Where unauthenticated users (and unrecognized roles) are sent.
pub const LOGIN_PATH: &str = "/login";

/// How many navigation entries fit in the mobile bottom bar.
pub const MOBILE_NAV_LIMIT: usize = 4;

/// Something a role may do beyond reading its own dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AddStudent,
    AddTeacher,
    CreateCourse,
    CreateAssignment,
    RecordAttendance,
    SubmitAssignment,
    ViewSubmissions,
    RecordMemorization,
    CreateEvent,
    ManageGuardians,
    ViewAnalytics,
}

impl Action {
    /// Button label for create-style actions.
    pub fn label(&self) -> &'static str {
        match self {
            Action::AddStudent => "Add Student",
            Action::AddTeacher => "Add Teacher",
            Action::CreateCourse => "New Course",
            Action::CreateAssignment => "Create Assignment",
            Action::RecordAttendance => "Record Attendance",
            Action::SubmitAssignment => "Submit Assignment",
            Action::ViewSubmissions => "View Submissions",
            Action::RecordMemorization => "Record Memorization",
            Action::CreateEvent => "New Event",
            Action::ManageGuardians => "Link Parent",
            Action::ViewAnalytics => "View Analytics",
        }
    }

    /// Quick-action buttons rendered on dashboards.
    pub fn is_create(&self) -> bool {
        matches!(
            self,
            Action::AddStudent
                | Action::AddTeacher
                | Action::CreateCourse
                | Action::CreateAssignment
                | Action::RecordAttendance
                | Action::SubmitAssignment
        )
    }
}

/// Icon key resolved to artwork by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavIcon {
    Dashboard,
    Courses,
    Assignments,
    Attendance,
    Memorization,
    Events,
    Students,
    Teachers,
    Analytics,
    Settings,
    QualityAssurance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub icon: NavIcon,
    pub path: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavSection {
    pub title: &'static str,
    pub items: &'static [NavItem],
}

/// Everything the UI and the server need to know about one role.
#[derive(Debug, PartialEq, Eq)]
pub struct RolePolicy {
    pub role: UserRole,
    pub landing_path: &'static str,
    pub sections: &'static [NavSection],
    pub actions: &'static [Action],
}

impl RolePolicy {
    pub fn allows(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// All navigation entries in display order.
    pub fn nav_items(&self) -> impl Iterator<Item = &'static NavItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    /// Entries shown in the mobile bottom navigation.
    pub fn mobile_items(&self) -> Vec<&'static NavItem> {
        self.nav_items().take(MOBILE_NAV_LIMIT).collect()
    }

    /// Create-style actions, in table order, for dashboard quick actions.
    pub fn create_actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.actions.iter().copied().filter(Action::is_create)
    }

    pub fn is_view_only(&self) -> bool {
        self.create_actions().next().is_none()
    }
}

const fn item(label: &'static str, icon: NavIcon, path: &'static str) -> NavItem {
    NavItem { label, icon, path }
}

const COURSES: NavItem = item("Courses", NavIcon::Courses, "/courses");
const ASSIGNMENTS: NavItem = item("Assignments", NavIcon::Assignments, "/assignments");
const ATTENDANCE: NavItem = item("Attendance", NavIcon::Attendance, "/attendance");
const MEMORIZATION: NavItem = item("Memorization", NavIcon::Memorization, "/memorization");
const EVENTS: NavItem = item("Events", NavIcon::Events, "/events");
const STUDENTS: NavItem = item("Students", NavIcon::Students, "/students");
const TEACHERS: NavItem = item("Teachers", NavIcon::Teachers, "/teachers");

const ANALYTICS_SECTION: NavSection = NavSection {
    title: "Analytics",
    items: &[item("Analytics", NavIcon::Analytics, "/analytics")],
};
const SETTINGS_SECTION: NavSection = NavSection {
    title: "Settings",
    items: &[item("Settings", NavIcon::Settings, "/settings")],
};

static DIRECTOR: RolePolicy = RolePolicy {
    role: UserRole::Director,
    landing_path: "/",
    sections: &[
        NavSection {
            title: "Main",
            items: &[
                item("Dashboard", NavIcon::Dashboard, "/"),
                COURSES,
                ASSIGNMENTS,
                ATTENDANCE,
                MEMORIZATION,
                EVENTS,
            ],
        },
        NavSection {
            title: "Administration",
            items: &[STUDENTS, TEACHERS],
        },
        ANALYTICS_SECTION,
        SETTINGS_SECTION,
    ],
    actions: &[
        Action::AddStudent,
        Action::AddTeacher,
        Action::CreateCourse,
        Action::CreateAssignment,
        Action::ViewSubmissions,
        Action::CreateEvent,
        Action::ManageGuardians,
        Action::ViewAnalytics,
    ],
};

static TEACHER: RolePolicy = RolePolicy {
    role: UserRole::Teacher,
    landing_path: "/teacher",
    sections: &[
        NavSection {
            title: "Main",
            items: &[
                item("Dashboard", NavIcon::Dashboard, "/teacher"),
                COURSES,
                ASSIGNMENTS,
                ATTENDANCE,
                MEMORIZATION,
                EVENTS,
            ],
        },
        NavSection {
            title: "Administration",
            items: &[STUDENTS],
        },
        ANALYTICS_SECTION,
        SETTINGS_SECTION,
    ],
    actions: &[
        Action::AddStudent,
        Action::CreateCourse,
        Action::CreateAssignment,
        Action::RecordAttendance,
        Action::ViewSubmissions,
        Action::RecordMemorization,
        Action::ViewAnalytics,
    ],
};

static STUDENT: RolePolicy = RolePolicy {
    role: UserRole::Student,
    landing_path: "/student",
    sections: &[NavSection {
        title: "Main",
        items: &[
            item("Dashboard", NavIcon::Dashboard, "/student"),
            item("My Courses", NavIcon::Courses, "/courses"),
            ASSIGNMENTS,
            MEMORIZATION,
            EVENTS,
        ],
    }],
    actions: &[Action::SubmitAssignment],
};

static PARENT: RolePolicy = RolePolicy {
    role: UserRole::Parent,
    landing_path: "/parent",
    sections: &[NavSection {
        title: "Main",
        items: &[item("Dashboard", NavIcon::Dashboard, "/parent"), EVENTS],
    }],
    actions: &[],
};

static COMPANY_ADMIN: RolePolicy = RolePolicy {
    role: UserRole::CompanyAdmin,
    landing_path: "/company-admin",
    sections: &[
        NavSection {
            title: "Main",
            items: &[item("Dashboard", NavIcon::Dashboard, "/company-admin")],
        },
        NavSection {
            title: "Enterprise Tools",
            items: &[item("QA", NavIcon::QualityAssurance, "/company-admin/qa")],
        },
    ],
    actions: &[],
};

/// Policy for a known role.
pub fn policy_for(role: UserRole) -> &'static RolePolicy {
    match role {
        UserRole::Director => &DIRECTOR,
        UserRole::Teacher => &TEACHER,
        UserRole::Student => &STUDENT,
        UserRole::Parent => &PARENT,
        UserRole::CompanyAdmin => &COMPANY_ADMIN,
    }
}

/// Policy for a raw role string. `None` means the caller should go to login.
pub fn policy_for_str(role: &str) -> Option<&'static RolePolicy> {
    UserRole::parse(role).map(policy_for)
}

/// Where a user with this role string lands after sign-in.
pub fn landing_path(role: Option<&str>) -> &'static str {
    role.and_then(policy_for_str)
        .map(|p| p.landing_path)
        .unwrap_or(LOGIN_PATH)
}

/// True when `role` may perform `action`. Unknown roles may do nothing.
pub fn can(role: &str, action: Action) -> bool {
    policy_for_str(role).is_some_and(|p| p.allows(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_actions(role: UserRole) -> Vec<Action> {
        policy_for(role).create_actions().collect()
    }

    #[test]
    fn every_role_has_a_landing_path() {
        for role in UserRole::ALL {
            let policy = policy_for(role);
            assert!(!policy.landing_path.is_empty());
            assert_eq!(policy.role, role);
        }
    }

    #[test]
    fn landing_paths_match_table() {
        assert_eq!(landing_path(Some("company_admin")), "/company-admin");
        assert_eq!(landing_path(Some("director")), "/");
        assert_eq!(landing_path(Some("teacher")), "/teacher");
        assert_eq!(landing_path(Some("student")), "/student");
        assert_eq!(landing_path(Some("parent")), "/parent");
    }

    #[test]
    fn unknown_or_absent_role_goes_to_login() {
        assert_eq!(landing_path(Some("janitor")), LOGIN_PATH);
        assert_eq!(landing_path(None), LOGIN_PATH);
        assert!(policy_for_str("").is_none());
    }

    #[test]
    fn create_actions_match_table() {
        assert!(create_actions(UserRole::CompanyAdmin).is_empty());
        assert_eq!(
            create_actions(UserRole::Director),
            vec![
                Action::AddStudent,
                Action::AddTeacher,
                Action::CreateCourse,
                Action::CreateAssignment
            ]
        );
        assert_eq!(
            create_actions(UserRole::Teacher),
            vec![
                Action::AddStudent,
                Action::CreateCourse,
                Action::CreateAssignment,
                Action::RecordAttendance
            ]
        );
        assert_eq!(create_actions(UserRole::Student), vec![Action::SubmitAssignment]);
        assert!(create_actions(UserRole::Parent).is_empty());
    }

    #[test]
    fn parent_and_company_admin_are_view_only() {
        assert!(policy_for(UserRole::Parent).is_view_only());
        assert!(policy_for(UserRole::CompanyAdmin).is_view_only());
        assert!(!policy_for(UserRole::Student).is_view_only());
    }

    #[test]
    fn extra_sections_match_table() {
        let titles = |role| -> Vec<&str> {
            policy_for(role)
                .sections
                .iter()
                .map(|s| s.title)
                .filter(|t| *t != "Main")
                .collect()
        };
        assert_eq!(titles(UserRole::CompanyAdmin), vec!["Enterprise Tools"]);
        assert_eq!(
            titles(UserRole::Director),
            vec!["Administration", "Analytics", "Settings"]
        );
        assert_eq!(
            titles(UserRole::Teacher),
            vec!["Administration", "Analytics", "Settings"]
        );
        assert!(titles(UserRole::Student).is_empty());
        assert!(titles(UserRole::Parent).is_empty());
    }

    #[test]
    fn administration_section_contents() {
        let admin_labels = |role| -> Vec<&str> {
            policy_for(role)
                .sections
                .iter()
                .find(|s| s.title == "Administration")
                .map(|s| s.items.iter().map(|i| i.label).collect())
                .unwrap_or_default()
        };
        assert_eq!(admin_labels(UserRole::Director), vec!["Students", "Teachers"]);
        assert_eq!(admin_labels(UserRole::Teacher), vec!["Students"]);
    }

    #[test]
    fn first_nav_item_is_the_landing_dashboard() {
        for role in UserRole::ALL {
            let policy = policy_for(role);
            let first = policy.nav_items().next().unwrap();
            assert_eq!(first.path, policy.landing_path);
            assert_eq!(first.icon, NavIcon::Dashboard);
        }
    }

    #[test]
    fn mobile_nav_is_capped() {
        for role in UserRole::ALL {
            assert!(policy_for(role).mobile_items().len() <= MOBILE_NAV_LIMIT);
        }
        assert_eq!(policy_for(UserRole::Parent).mobile_items().len(), 2);
    }

    #[test]
    fn only_teachers_record_attendance() {
        assert!(can("teacher", Action::RecordAttendance));
        assert!(!can("director", Action::RecordAttendance));
        assert!(!can("student", Action::RecordAttendance));
        assert!(!can("bogus", Action::RecordAttendance));
    }

    #[test]
    fn only_students_submit() {
        for role in UserRole::ALL {
            assert_eq!(
                policy_for(role).allows(Action::SubmitAssignment),
                role == UserRole::Student
            );
        }
    }
}
