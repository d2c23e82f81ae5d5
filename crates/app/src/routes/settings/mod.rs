mod features_section;
mod profile_section;

use dioxus::prelude::*;

use features_section::FeaturesSection;
use profile_section::ProfileSection;

/// Account details and the switches this deployment runs with.
#[component]
pub fn Settings() -> Element {
    rsx! {
        div { class: "settings-page",
            h2 { class: "settings-title", "Settings" }
            ProfileSection {}
            FeaturesSection {}
        }
    }
}
