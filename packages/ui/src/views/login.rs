//! Sign-in / sign-up page.

use dioxus::prelude::*;
use store::auth::{SIGN_IN_FALLBACK, SIGN_UP_FALLBACK};
use store::AuthReply;

use crate::state::{step, step_with, AuthForm, AuthMode, AuthStatus, Submission};
use crate::{reload_at, Destination};

#[component]
pub fn LoginView(on_navigate: EventHandler<Destination>) -> Element {
    let mut form = use_signal(AuthForm::default);

    let onsubmit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let Some(submission) = step_with(&mut form, AuthForm::submit) else {
            return;
        };

        let reply = match submission {
            Submission::SignIn {
                credentials,
                remember,
            } => api::login(credentials.email, credentials.password, remember)
                .await
                .unwrap_or_else(|e| {
                    tracing::error!("sign-in request failed: {e}");
                    AuthReply::failed(SIGN_IN_FALLBACK)
                }),
            Submission::SignUp { credentials } => {
                api::signup(credentials.email, credentials.password)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!("sign-up request failed: {e}");
                        AuthReply::failed(SIGN_UP_FALLBACK)
                    })
            }
        };

        if let Some(destination) = step_with(&mut form, |f| f.resolved(reply)) {
            reload_at(destination, on_navigate);
        }
    };

    let state = form();
    let mode = state.mode;
    let heading = mode.heading();
    let submit_label = mode.submit_label();
    let (prompt, switch_label) = mode.switch_prompt();

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-panel",
                div {
                    style: "text-align: center;",
                    h2 { class: "auth-heading", "{heading}" }
                    p {
                        class: "muted",
                        "{prompt}"
                        button {
                            r#type: "button",
                            class: "link-button",
                            onclick: move |_| step(&mut form, AuthForm::toggle_mode),
                            "{switch_label}"
                        }
                    }
                }

                {match &state.status {
                    AuthStatus::Error(message) => rsx! {
                        div {
                            class: "banner banner-error",
                            h3 { "Error" }
                            p { "{message}" }
                        }
                    },
                    AuthStatus::Success { message, .. } => rsx! {
                        div {
                            class: "banner banner-success",
                            h3 { "Success" }
                            p { "{message}" }
                        }
                    },
                    AuthStatus::Idle | AuthStatus::Submitting => rsx! {},
                }}

                form {
                    class: "auth-form",
                    onsubmit: onsubmit,
                    div {
                        label { r#for: "email", "Email address" }
                        input {
                            id: "email",
                            name: "email",
                            r#type: "email",
                            autocomplete: "email",
                            required: true,
                            value: "{state.email}",
                            oninput: move |evt: FormEvent| form.write().email = evt.value(),
                        }
                    }
                    div {
                        label { r#for: "password", "Password" }
                        input {
                            id: "password",
                            name: "password",
                            r#type: "password",
                            autocomplete: if mode == AuthMode::SignIn { "current-password" } else { "new-password" },
                            required: true,
                            minlength: "6",
                            value: "{state.password}",
                            oninput: move |evt: FormEvent| form.write().password = evt.value(),
                        }
                    }

                    if mode == AuthMode::SignIn {
                        div {
                            class: "remember-row",
                            input {
                                id: "remember-me",
                                name: "remember-me",
                                r#type: "checkbox",
                                checked: state.remember,
                                onchange: move |evt: FormEvent| form.write().remember = evt.checked(),
                            }
                            label { r#for: "remember-me", "Remember me" }
                        }
                    }

                    button {
                        r#type: "submit",
                        class: "btn btn-primary btn-block",
                        disabled: state.is_submitting(),
                        if state.is_submitting() {
                            "Processing..."
                        } else {
                            "{submit_label}"
                        }
                    }
                }
            }
        }
    }
}
