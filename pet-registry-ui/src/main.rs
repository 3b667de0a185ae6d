//! Pet Registry Frontend
//!
//! Browser front-end for the on-chain pet ownership registry, built with
//! Leptos (WASM).
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application. All workflows
//! (connect, list, register, search) run on the `pet-registry` view
//! coordinator; this crate supplies the `window.ethereum` transport and the
//! components that render the coordinator's state.

use leptos::*;

mod app;
mod components;
mod state;
mod wallet;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
