use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{HistoryView, HomeView, LoginView, PracticeView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/practice", PracticeView)] Practice {},
        #[route("/history", HistoryView)] History {},
        #[route("/login", LoginView)] Login {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Sightread" }
            ul {
                li { Link { to: Route::Home {}, "Home" } }
                li { Link { to: Route::Practice {}, "Practice" } }
                li { Link { to: Route::History {}, "History" } }
                li { Link { to: Route::Login {}, "Account" } }
            }
        }
    }
}
