//! Search Section Component
//!
//! Look up any registered pet by id.

use leptos::*;

use pet_registry::view::SearchState;

use super::loading::InlineLoading;
use super::pet_card::PetCard;
use crate::state::use_controller;

#[component]
pub fn SearchSection() -> impl IntoView {
    let controller = use_controller();
    let view = controller.view;
    let input = controller.search_input;

    let searching = move || view.with(|v| matches!(v.search, SearchState::Searching { .. }));

    let on_submit = {
        let controller = controller.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            controller.search();
        }
    };

    view! {
        <div class="bg-white rounded-xl shadow-lg p-6 mb-8">
            <h2 class="text-xl font-bold mb-4">"Search Pet by ID"</h2>
            <form on:submit=on_submit class="flex gap-4">
                <input
                    type="text"
                    inputmode="numeric"
                    placeholder="Enter Pet ID"
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    class="flex-1 px-4 py-2 border border-gray-300 rounded-lg"
                />
                <button
                    type="submit"
                    disabled=move || searching() || input.with(|s| s.trim().is_empty())
                    class="flex items-center gap-2 px-6 py-2 bg-purple-600 text-white rounded-lg disabled:opacity-50"
                >
                    {move || searching().then(|| view! { <InlineLoading /> })}
                    "Search"
                </button>
            </form>

            {move || match view.with(|v| v.search.clone()) {
                SearchState::Idle | SearchState::Searching { .. } => view! {}.into_view(),
                SearchState::Found(pet) => {
                    let owned = view.with_untracked(|v| v.account()) == Some(pet.owner);
                    view! {
                        <div class="mt-6">
                            <h3 class="text-lg font-semibold mb-4">"Search Result:"</h3>
                            <div class="max-w-md">
                                <PetCard pet=pet owned=owned />
                            </div>
                        </div>
                    }.into_view()
                }
                SearchState::NotFound { id } => view! {
                    <p class="mt-6 text-gray-600">{format!("Pet #{} not found.", id)}</p>
                }.into_view(),
                SearchState::Failed { id, error } => view! {
                    <p class="mt-6 text-red-600">
                        {format!("Could not look up pet #{}: {}", id, error)}
                    </p>
                }.into_view(),
            }}
        </div>
    }
}
