//! # client
//!
//! Leptos frontend for the budget tracker. Rendered on the server (`ssr`)
//! and hydrated in the browser (`hydrate`).
//!
//! This crate contains the root page composition, the login/signup forms,
//! the expenses page, client state, and REST helpers.

pub mod app;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
