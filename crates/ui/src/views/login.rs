use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);
    let mut session = use_signal(|| ctx.auth().session());

    let auth = ctx.auth();
    let submit = move |_| {
        if busy() {
            return;
        }
        let auth = auth.clone();
        let email_value = email.peek().clone();
        let password_value = password.peek().clone();
        busy.set(true);
        error.set(None);
        spawn(async move {
            match auth.login(&email_value, &password_value).await {
                Ok(_) => {
                    navigator.push(Route::Home {});
                }
                Err(err) => {
                    error.set(Some(err.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let logout_auth = ctx.auth();

    rsx! {
        div { class: "page",
            h2 { "Account" }

            match session() {
                Some(user) => rsx! {
                    p { "Signed in as {user.display_name} ({user.email})." }
                    button {
                        class: "secondary",
                        onclick: move |_| {
                            logout_auth.logout();
                            session.set(None);
                        },
                        "Sign out"
                    }
                },
                None => rsx! {
                    form {
                        class: "login-form",
                        onsubmit: submit,
                        label { r#for: "login-email", "Email" }
                        input {
                            id: "login-email",
                            r#type: "email",
                            value: "{email}",
                            oninput: move |evt| email.set(evt.value()),
                        }
                        label { r#for: "login-password", "Password" }
                        input {
                            id: "login-password",
                            r#type: "password",
                            value: "{password}",
                            oninput: move |evt| password.set(evt.value()),
                        }
                        button { r#type: "submit", disabled: busy(), "Sign in" }
                    }
                    if let Some(message) = error() {
                        p { class: "error", "{message}" }
                    }
                },
            }
        }
    }
}
