//! Header Component
//!
//! Brand, wallet connection and the entry point to registration.

use leptos::*;

use pet_registry::chain::NetworkSwitch;
use pet_registry::projection::short_address;
use pet_registry::view::ConnectionState;

use super::loading::InlineLoading;
use crate::state::use_controller;
use crate::wallet::BrowserTransport;

#[component]
pub fn Header() -> impl IntoView {
    let controller = use_controller();
    let view = controller.view;

    view! {
        <div class="bg-white shadow-sm border-b">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-4">
                <div class="flex items-center justify-between">
                    <div class="flex items-center gap-3">
                        <span class="text-3xl text-purple-600">"♥"</span>
                        <h1 class="text-2xl font-bold text-gray-900">"Pet Registry"</h1>
                    </div>

                    {move || match view.with(|v| v.connection.clone()) {
                        ConnectionState::Disconnected => {
                            let controller = controller.clone();
                            view! {
                                <div class="flex items-center gap-3">
                                    {(!BrowserTransport::is_available()).then(|| view! {
                                        <span class="text-sm text-gray-500">"No wallet detected"</span>
                                    })}
                                    <button
                                        on:click=move |_| controller.connect()
                                        class="flex items-center gap-2 px-6 py-2 bg-purple-600 text-white
                                               rounded-lg font-medium hover:bg-purple-700 transition-colors"
                                    >
                                        "Connect Wallet"
                                    </button>
                                </div>
                            }.into_view()
                        }
                        ConnectionState::Connecting => view! {
                            <div class="flex items-center gap-2 text-gray-600">
                                <InlineLoading />
                                <span>"Connecting..."</span>
                            </div>
                        }.into_view(),
                        ConnectionState::Connected { account, network } => {
                            let show_register = controller.show_register;
                            view! {
                                <div class="flex items-center gap-4">
                                    <NetworkBadge network=network />
                                    <span class="text-sm text-gray-600" title=account.to_string()>
                                        {short_address(&account)}
                                    </span>
                                    <button
                                        on:click=move |_| show_register.set(true)
                                        class="flex items-center gap-2 px-4 py-2 bg-blue-600 text-white
                                               rounded-lg font-medium hover:bg-blue-700 transition-colors"
                                    >
                                        "Register Pet"
                                    </button>
                                </div>
                            }.into_view()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}

/// Shown only when the wallet stayed on another chain
#[component]
fn NetworkBadge(network: NetworkSwitch) -> impl IntoView {
    match network {
        NetworkSwitch::OnTarget { .. } => view! {}.into_view(),
        NetworkSwitch::ProceedingOnCurrent { current, .. } => {
            let label = match current {
                Some(id) => format!("Chain {}", id),
                None => "Unknown network".to_string(),
            };
            view! {
                <span class="px-3 py-1 rounded-full text-xs bg-yellow-100 text-yellow-800">
                    {label}
                </span>
            }
            .into_view()
        }
    }
}
