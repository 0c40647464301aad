//! Email + password login form.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::state::auth::AuthState;

pub(crate) const MSG_LOGIN_MISSING: &str = "Enter your email and password.";
pub(crate) const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";

/// Trim and lower-case the email; both fields must be present.
pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(MSG_LOGIN_MISSING);
    }
    if !looks_like_email(&email) {
        return Err(MSG_INVALID_EMAIL);
    }
    Ok((email, password.to_owned()))
}

/// Cheap shape check; the server owns real validation.
pub(crate) fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_context::<RwSignal<AuthState>>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::login(&email_value, &password_value).await {
                Ok(()) => {
                    if let (Some(auth), Some(user)) = (auth, crate::net::api::fetch_current_user().await) {
                        auth.set(AuthState::signed_in(user));
                    }
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href("/expenses");
                    }
                }
                Err(e) => {
                    info.set(format!("Login failed: {e}"));
                    busy.set(false);
                }
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (auth, email_value, password_value);
    };

    view! {
        <div class="login-card">
            <h2>"Log In"</h2>
            <form class="auth-form" on:submit=on_submit>
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
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button class="auth-button" type="submit" disabled=move || busy.get()>
                    "Log In"
                </button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="auth-message">{move || info.get()}</p>
            </Show>
        </div>
    }
}
