pub mod analytics;
pub mod assignments;
pub mod attendance;
pub mod company_admin;
pub mod courses;
pub mod dashboard;
pub mod events;
pub mod login;
pub mod memorization;
pub mod not_found;
pub mod register;
pub mod settings;
pub mod users;

use crate::auth::{sign_out, use_auth};
use crate::query::use_query_cache;
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{
    LdActivity, LdBookOpen, LdBookmark, LdCalendar, LdClock, LdFileText, LdGraduationCap,
    LdLayoutDashboard, LdSettings, LdShield, LdUserCheck, LdUsers,
};
use dioxus_free_icons::Icon;
use shared_types::guard::{self, GuardOutcome, SessionStatus, FORBIDDEN_REDIRECT_DELAY_MS};
use shared_types::policy::{NavIcon, NavItem};
use shared_types::UserRole;

use analytics::Analytics;
use assignments::Assignments;
use attendance::Attendance;
use company_admin::{CompanyAdminDashboard, QualityAssurance};
use courses::{CourseDetail, CourseList};
use dashboard::{
    DirectorDashboard, ParentDashboard, StudentDashboard, StudentProgressView, TeacherDashboard,
};
use events::Events;
use login::Login;
use memorization::MemorizationLog;
use not_found::NotFound;
use register::Register;
use settings::Settings;
use users::{Students, Teachers};

/// Application routes.
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/login?:redirect")]
    Login { redirect: Option<String> },
    #[route("/register")]
    Register {},
    #[layout(AuthGuard)]
    #[layout(AppLayout)]
    #[route("/")]
    DirectorDashboard {},
    #[route("/teacher")]
    TeacherDashboard {},
    #[route("/student")]
    StudentDashboard {},
    #[route("/parent")]
    ParentDashboard {},
    #[route("/parent/student/:id")]
    StudentProgressView { id: i64 },
    #[route("/company-admin")]
    CompanyAdminDashboard {},
    #[route("/company-admin/qa")]
    QualityAssurance {},
    #[route("/courses")]
    CourseList {},
    #[route("/courses/:id")]
    CourseDetail { id: i64 },
    #[route("/assignments")]
    Assignments {},
    #[route("/attendance")]
    Attendance {},
    #[route("/memorization")]
    MemorizationLog {},
    #[route("/events")]
    Events {},
    #[route("/students")]
    Students {},
    #[route("/teachers")]
    Teachers {},
    #[route("/analytics")]
    Analytics {},
    #[route("/settings")]
    Settings {},
    #[end_layout]
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

const STAFF: &[UserRole] = &[UserRole::Director, UserRole::Teacher];
const STAFF_AND_STUDENTS: &[UserRole] = &[UserRole::Director, UserRole::Teacher, UserRole::Student];

impl Route {
    /// Roles admitted by the guard. `None` admits every signed-in role;
    /// public routes never reach the guard.
    pub fn allowed_roles(&self) -> Option<&'static [UserRole]> {
        match self {
            Route::DirectorDashboard {} | Route::Teachers {} => Some(&[UserRole::Director]),
            Route::TeacherDashboard {} => Some(&[UserRole::Teacher]),
            Route::StudentDashboard {} => Some(&[UserRole::Student]),
            Route::ParentDashboard {} => Some(&[UserRole::Parent]),
            Route::StudentProgressView { .. } => {
                Some(&[UserRole::Director, UserRole::Teacher, UserRole::Parent])
            }
            Route::CompanyAdminDashboard {} | Route::QualityAssurance {} => {
                Some(&[UserRole::CompanyAdmin])
            }
            Route::CourseList {}
            | Route::CourseDetail { .. }
            | Route::Assignments {}
            | Route::MemorizationLog {} => Some(STAFF_AND_STUDENTS),
            Route::Attendance {}
            | Route::Students {}
            | Route::Analytics {}
            | Route::Settings {} => Some(STAFF),
            Route::Events {} => None,
            Route::Login { .. } | Route::Register {} | Route::NotFound { .. } => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::DirectorDashboard {}
            | Route::TeacherDashboard {}
            | Route::StudentDashboard {}
            | Route::ParentDashboard {}
            | Route::CompanyAdminDashboard {} => "Dashboard",
            Route::StudentProgressView { .. } => "Student Progress",
            Route::QualityAssurance {} => "Quality Assurance",
            Route::CourseList {} | Route::CourseDetail { .. } => "Courses",
            Route::Assignments {} => "Assignments",
            Route::Attendance {} => "Attendance",
            Route::MemorizationLog {} => "Memorization",
            Route::Events {} => "Events",
            Route::Students {} => "Students",
            Route::Teachers {} => "Teachers",
            Route::Analytics {} => "Analytics",
            Route::Settings {} => "Settings",
            Route::Login { .. } | Route::Register {} => "Sign In",
            Route::NotFound { .. } => "Not Found",
        }
    }
}

/// Whether a navigation entry should be highlighted for the current path.
pub fn is_active(current_path: &str, item_path: &str) -> bool {
    let current = current_path.split('?').next().unwrap_or(current_path);
    if item_path == "/" {
        return current == "/";
    }
    current == item_path
        || current
            .strip_prefix(item_path)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Guards every route inside the app shell.
///
/// Uses `use_server_future` with `?` so that SSR suspends until the session
/// lookup resolves; a `SuspenseBoundary` in `App` shows the placeholder.
#[component]
fn AuthGuard() -> Element {
    let mut auth = use_auth();
    let route: Route = use_route();

    let resource = use_server_future(move || async move { server::api::get_current_user().await })?;
    let lookup = resource.read().as_ref().cloned();

    match &lookup {
        Some(Ok(Some(user))) => {
            if auth.current_user.peek().as_ref() != Some(user) {
                auth.set_user(user.clone());
            }
        }
        Some(Ok(None)) | Some(Err(_)) => {
            if auth.current_user.peek().is_some() {
                auth.clear_auth();
            }
        }
        None => {}
    }

    let outcome = guard::evaluate(SessionStatus::from_lookup(lookup.as_ref()), route.allowed_roles());

    match outcome {
        GuardOutcome::Loading => rsx! {
            div { class: "auth-guard-loading",
                p { "Loading..." }
            }
        },
        GuardOutcome::Unauthenticated { redirect_to } => {
            navigator().replace(redirect_to);
            rsx! {
                div { class: "auth-guard-loading",
                    p { "Redirecting to login..." }
                }
            }
        }
        GuardOutcome::Forbidden { redirect_to } => rsx! {
            ForbiddenNotice { redirect_to }
        },
        GuardOutcome::Authorized(_) => rsx! { Outlet::<Route> {} },
    }
}

fn redirect_delay_script(delay_ms: u64) -> String {
    format!("await new Promise(r => setTimeout(r, {delay_ms})); return null;")
}

/// Brief denial message, then back to the user's own landing page. If the
/// delay cannot run the notice stays up with a link instead.
#[component]
fn ForbiddenNotice(redirect_to: &'static str) -> Element {
    use_effect(move || {
        spawn(async move {
            let script = redirect_delay_script(FORBIDDEN_REDIRECT_DELAY_MS);
            if let Err(err) = document::eval(&script).await {
                tracing::warn!(?err, redirect_to, "Redirect delay failed");
                return;
            }
            navigator().replace(redirect_to);
        });
    });

    rsx! {
        div { class: "auth-guard-denied",
            h2 { "Access denied" }
            p { "Your role does not have access to this page. Taking you back to your dashboard..." }
            Link { to: redirect_to, class: "button", "Go to my dashboard" }
        }
    }
}

#[component]
fn NavIconView(icon: NavIcon) -> Element {
    match icon {
        NavIcon::Dashboard => rsx! { Icon::<LdLayoutDashboard> { icon: LdLayoutDashboard, width: 18, height: 18 } },
        NavIcon::Courses => rsx! { Icon::<LdBookOpen> { icon: LdBookOpen, width: 18, height: 18 } },
        NavIcon::Assignments => rsx! { Icon::<LdFileText> { icon: LdFileText, width: 18, height: 18 } },
        NavIcon::Attendance => rsx! { Icon::<LdClock> { icon: LdClock, width: 18, height: 18 } },
        NavIcon::Memorization => rsx! { Icon::<LdBookmark> { icon: LdBookmark, width: 18, height: 18 } },
        NavIcon::Events => rsx! { Icon::<LdCalendar> { icon: LdCalendar, width: 18, height: 18 } },
        NavIcon::Students => rsx! { Icon::<LdGraduationCap> { icon: LdGraduationCap, width: 18, height: 18 } },
        NavIcon::Teachers => rsx! { Icon::<LdUserCheck> { icon: LdUserCheck, width: 18, height: 18 } },
        NavIcon::Analytics => rsx! { Icon::<LdActivity> { icon: LdActivity, width: 18, height: 18 } },
        NavIcon::Settings => rsx! { Icon::<LdSettings> { icon: LdSettings, width: 18, height: 18 } },
        NavIcon::QualityAssurance => rsx! { Icon::<LdShield> { icon: LdShield, width: 18, height: 18 } },
    }
}

#[component]
fn NavLink(item: NavItem, current: String, class: &'static str) -> Element {
    let active = is_active(&current, item.path);
    rsx! {
        Link {
            to: item.path,
            class: if active { "{class} active" } else { "{class}" },
            NavIconView { icon: item.icon }
            span { "{item.label}" }
        }
    }
}

/// Navigation shell: desktop sidebar, top bar and mobile bottom nav, all
/// driven by the signed-in role's policy.
#[component]
fn AppLayout() -> Element {
    let route: Route = use_route();
    let auth = use_auth();
    let cache = use_query_cache();

    let current = route.to_string();
    let user = auth.current_user.read().clone();
    let Some(policy) = auth.policy() else {
        // The guard only renders this layout for recognized roles.
        return rsx! { Outlet::<Route> {} };
    };

    let (name, initials, role_label) = user
        .as_ref()
        .map(|u| (u.full_name.clone(), u.initials(), policy.role.label()))
        .unwrap_or_default();

    rsx! {
        div { class: "app-shell",
            aside { class: "sidebar",
                div { class: "sidebar-brand",
                    span { class: "sidebar-brand-name", "Islamic Studies" }
                }
                for section in policy.sections.iter() {
                    div { class: "sidebar-group",
                        p { class: "sidebar-group-label", "{section.title}" }
                        for item in section.items.iter() {
                            NavLink { item: *item, current: current.clone(), class: "sidebar-link" }
                        }
                    }
                }
            }

            div { class: "app-main",
                header { class: "topbar",
                    h1 { class: "topbar-title", "{route.title()}" }
                    div { class: "topbar-user",
                        span { class: "avatar", "{initials}" }
                        div { class: "topbar-identity",
                            span { class: "topbar-name", "{name}" }
                            span { class: "badge", "{role_label}" }
                        }
                        button {
                            class: "button button-ghost",
                            onclick: move |_| async move { sign_out(auth, cache).await },
                            "Log out"
                        }
                    }
                }
                main { class: "app-content",
                    Outlet::<Route> {}
                }
            }

            nav { class: "mobile-nav",
                for item in policy.mobile_items() {
                    NavLink { item: *item, current: current.clone(), class: "mobile-nav-link" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::policy::policy_for;
    use shared_types::AuthUser;
    use std::str::FromStr;

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            id: 1,
            username: "u".into(),
            full_name: "Test User".into(),
            role: role.as_str().into(),
            email: None,
            profile_picture: None,
        }
    }

    #[test]
    fn every_nav_item_is_reachable_by_its_role() {
        for role in UserRole::ALL {
            let u = user(role);
            for item in policy_for(role).nav_items() {
                let route = Route::from_str(item.path)
                    .unwrap_or_else(|_| panic!("{} does not parse", item.path));
                assert!(
                    !matches!(route, Route::NotFound { .. }),
                    "{} has no page",
                    item.path
                );
                assert_eq!(
                    guard::evaluate(SessionStatus::SignedIn(&u), route.allowed_roles()),
                    GuardOutcome::Authorized(role),
                    "{role} cannot open {}",
                    item.path
                );
            }
        }
    }

    #[test]
    fn landing_routes_admit_only_their_role() {
        for role in UserRole::ALL {
            let landing = Route::from_str(policy_for(role).landing_path).unwrap();
            for other in UserRole::ALL.into_iter().filter(|r| *r != role) {
                let u = user(other);
                assert_eq!(
                    guard::evaluate(SessionStatus::SignedIn(&u), landing.allowed_roles()),
                    GuardOutcome::Forbidden {
                        redirect_to: policy_for(other).landing_path
                    }
                );
            }
        }
    }

    #[test]
    fn parent_cannot_open_attendance() {
        let u = user(UserRole::Parent);
        let outcome = guard::evaluate(
            SessionStatus::SignedIn(&u),
            Route::Attendance {}.allowed_roles(),
        );
        assert_eq!(outcome, GuardOutcome::Forbidden { redirect_to: "/parent" });
    }

    #[test]
    fn redirect_delay_waits_the_configured_time() {
        let script = redirect_delay_script(FORBIDDEN_REDIRECT_DELAY_MS);
        assert!(script.contains(&format!("setTimeout(r, {FORBIDDEN_REDIRECT_DELAY_MS})")));
        assert!(script.starts_with("await "));
    }

    #[test]
    fn active_link_matching() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/courses", "/"));
        assert!(is_active("/courses/4", "/courses"));
        assert!(!is_active("/courses-archive", "/courses"));
        assert!(is_active("/company-admin/qa", "/company-admin/qa"));
    }
}
