//! Account creation form. A successful signup logs straight in.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;

use super::login::{MSG_INVALID_EMAIL, looks_like_email};
use crate::state::auth::AuthState;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;
pub(crate) const MSG_NAME_MISSING: &str = "Enter your name.";
pub(crate) const MSG_PASSWORD_SHORT: &str = "Password must be at least 8 characters.";
pub(crate) const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match.";

/// Validated signup fields: trimmed name, normalized email, raw password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub(crate) fn validate_signup_input(
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<SignupInput, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MSG_NAME_MISSING);
    }
    let email = email.trim().to_ascii_lowercase();
    if !looks_like_email(&email) {
        return Err(MSG_INVALID_EMAIL);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(MSG_PASSWORD_SHORT);
    }
    if password != confirm {
        return Err(MSG_PASSWORD_MISMATCH);
    }
    Ok(SignupInput { name: name.to_owned(), email, password: password.to_owned() })
}

#[component]
pub fn Signup() -> impl IntoView {
    let auth = use_context::<RwSignal<AuthState>>();
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let input = match validate_signup_input(&name.get(), &email.get(), &password.get(), &confirm.get()) {
            Ok(input) => input,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating account...".to_owned());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let result = match crate::net::api::signup(&input.name, &input.email, &input.password).await {
                Ok(user) => crate::net::api::login(&input.email, &input.password)
                    .await
                    .map(|()| user),
                Err(e) => Err(e),
            };
            match result {
                Ok(user) => {
                    if let Some(auth) = auth {
                        auth.set(AuthState::signed_in(user));
                    }
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href("/expenses");
                    }
                }
                Err(e) => {
                    info.set(format!("Signup failed: {e}"));
                    busy.set(false);
                }
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (auth, input);
    };

    view! {
        <div class="signup-card">
            <h2>"Sign Up"</h2>
            <form class="auth-form" on:submit=on_submit>
                <input
                    class="auth-input"
                    type="text"
                    placeholder="Name"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    type="email"
                    placeholder="you@example.com"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    type="password"
                    placeholder="Password (8+ characters)"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    type="password"
                    placeholder="Confirm password"
                    prop:value=move || confirm.get()
                    on:input=move |ev| confirm.set(event_target_value(&ev))
                />
                <button class="auth-button" type="submit" disabled=move || busy.get()>
                    "Create Account"
                </button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="auth-message">{move || info.get()}</p>
            </Show>
        </div>
    }
}
