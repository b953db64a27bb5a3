use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

/// Root component: global assets, window title, router.
#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Sightread" }

        ErrorBoundary {
            handle_error: |errors: ErrorContext| rsx! {
                div { class: "fatal",
                    h1 { "Sightread hit a wrong note" }
                    p { "Restart the app; if this keeps happening, file an issue." }
                    pre { "{errors:?}" }
                }
            },
            Router::<Route> {}
        }
    }
}
