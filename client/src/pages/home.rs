//! Landing page: title plus the login and signup forms.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;

use super::login::Login;
use super::signup::Signup;

pub const APP_TITLE: &str = "Budget Tracker App";

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home-page">
            <h1>{APP_TITLE}</h1>

            <Login/>
            <hr/>
            <Signup/>
        </div>
    }
}
