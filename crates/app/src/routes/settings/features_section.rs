use dioxus::prelude::*;
use shared_types::FeatureFlags;

/// Read-only view of the flags loaded from `config.toml`.
#[component]
pub fn FeaturesSection() -> Element {
    let flags: FeatureFlags = use_context();
    let rows = [
        ("Object storage for submissions", flags.s3),
        ("Telemetry export", flags.telemetry),
        ("Self registration", flags.self_registration),
    ];

    rsx! {
        section { class: "card settings-section",
            h3 { "Features" }
            ul { class: "flag-list",
                for (label, on) in rows {
                    li { key: "{label}",
                        span { "{label}" }
                        if on {
                            span { class: "badge badge-success", "On" }
                        } else {
                            span { class: "badge", "Off" }
                        }
                    }
                }
            }
        }
    }
}
