use dioxus::prelude::*;
use shared_types::policy::policy_for;
use shared_types::UserRole;

use super::Greeting;
use crate::widgets::{AttendanceOverview, MemorizationOverview, QuickActions, UpcomingEvents};

#[component]
pub fn DirectorDashboard() -> Element {
    rsx! {
        Greeting { subtitle: "School overview" }
        QuickActions { policy: policy_for(UserRole::Director) }
        div { class: "widget-grid",
            AttendanceOverview {}
            MemorizationOverview {}
            UpcomingEvents {}
        }
    }
}
