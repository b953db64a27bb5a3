use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = ctx.auth().session();

    rsx! {
        div { class: "page",
            h2 { "{ctx.app_name()}" }
            p { "Read the note on the staff, answer before the clock runs out." }

            match session {
                Some(user) => rsx! {
                    p { "Signed in as {user.display_name}. Finished sessions land in your history." }
                },
                None => rsx! {
                    p {
                        "You can practice without an account; "
                        Link { to: Route::Login {}, "sign in" }
                        " to keep your results."
                    }
                },
            }

            p {
                Link { class: "cta", to: Route::Practice {}, "Start practicing" }
            }
        }
    }
}
