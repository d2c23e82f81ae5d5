use dioxus::prelude::*;
use shared_types::policy::policy_for;
use shared_types::UserRole;

use super::Greeting;
use crate::auth::use_auth;
use crate::widgets::{
    AttendanceOverview, MemorizationOverview, MyAssignmentsWidget, QuickActions, UpcomingEvents,
};

#[component]
pub fn StudentDashboard() -> Element {
    let auth = use_auth();
    let student_id = auth.user_id();

    rsx! {
        Greeting { subtitle: "Keep up the good work" }
        QuickActions { policy: policy_for(UserRole::Student) }
        div { class: "widget-grid",
            MyAssignmentsWidget {}
            AttendanceOverview { student_id }
            MemorizationOverview { student_id }
            UpcomingEvents {}
        }
    }
}
