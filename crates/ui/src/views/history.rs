use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{HistoryRowVm, map_history_rows};

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    rows: Vec<HistoryRowVm>,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();
    let session = ctx.auth().session();

    let resource = use_resource(move || {
        let history = history.clone();
        let session = session.clone();
        async move {
            let user = session.ok_or(ViewError::NotSignedIn)?;
            let entries = history
                .recent_entries(user.user_id)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok(HistoryData {
                rows: map_history_rows(&entries),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "History" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.rows.is_empty() {
                        p { "No finished sessions yet. "
                            Link { to: Route::Practice {}, "Play one" }
                            "."
                        }
                    } else {
                        table { class: "history-table",
                            thead {
                                tr {
                                    th { "Date" }
                                    th { "Length" }
                                    th { "Score" }
                                    th { "Accuracy" }
                                    th { "NPM" }
                                }
                            }
                            tbody {
                                for row in data.rows {
                                    HistoryRow { row }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(ViewError::NotSignedIn) => rsx! {
                    p {
                        Link { to: Route::Login {}, "Sign in" }
                        " to see your finished sessions."
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn HistoryRow(row: HistoryRowVm) -> Element {
    rsx! {
        tr {
            td { "{row.date_label}" }
            td { "{row.time_length}" }
            td { "{row.fraction}" }
            td { "{row.accuracy_label}" }
            td { "{row.npm}" }
        }
    }
}
