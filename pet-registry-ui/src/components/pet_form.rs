//! Pet Form Component
//!
//! Edit and transfer forms for an owned pet. Open while `pet_form` is set.

use leptos::*;

use pet_registry::registry::PetUpdate;
use pet_registry::view::PetActionState;

use crate::state::{use_controller, PetForm};

#[component]
pub fn PetFormModal() -> impl IntoView {
    let controller = use_controller();
    let view = controller.view;
    let pet_form = controller.pet_form;

    let busy = move || view.with(|v| v.pet_action.pet().is_some());

    let on_submit = {
        let controller = controller.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            controller.submit_pet_form();
        }
    };

    let title = move || match pet_form.get() {
        Some(PetForm::Edit { id, .. }) => format!("Edit Pet #{}", id),
        Some(PetForm::Transfer { id, .. }) => format!("Transfer Pet #{}", id),
        None => String::new(),
    };

    // form kind only; field edits keep the same inputs
    let is_edit = create_memo(move |_| {
        pet_form.with(|form| matches!(form, Some(PetForm::Edit { .. })))
    });

    view! {
        <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center p-4 z-50">
            <div class="bg-white rounded-xl shadow-2xl max-w-md w-full max-h-[90vh] overflow-y-auto">
                <form on:submit=on_submit class="p-6">
                    <h2 class="text-2xl font-bold text-gray-900 mb-6">{title}</h2>

                    <div class="space-y-4">
                        {move || if is_edit.get() {
                            view! {
                                <EditField label="Pet Name *" get=|u| u.name.clone() set=|u, v| u.name = v />
                                <EditField label="Breed *" get=|u| u.breed.clone() set=|u, v| u.breed = v />
                                <EditField label="Image URL" get=|u| u.image_url.clone() set=|u, v| u.image_url = v />
                                <EditField label="Description" get=|u| u.description.clone() set=|u, v| u.description = v />
                            }.into_view()
                        } else {
                            view! { <NewOwnerField /> }.into_view()
                        }}

                        <div class="flex gap-4 pt-4">
                            <button
                                type="button"
                                on:click=move |_| pet_form.set(None)
                                class="flex-1 px-4 py-2 border border-gray-300 text-gray-700 rounded-lg font-medium hover:bg-gray-50"
                            >
                                "Cancel"
                            </button>
                            <button
                                type="submit"
                                disabled=busy
                                class="flex-1 px-4 py-2 bg-purple-600 text-white rounded-lg font-medium
                                       hover:bg-purple-700 disabled:opacity-50"
                            >
                                {move || match view.with(|v| v.pet_action.clone()) {
                                    PetActionState::Idle => "Save".to_string(),
                                    PetActionState::Submitting { .. } => "Waiting for signature...".to_string(),
                                    PetActionState::Confirming { tx, .. } => {
                                        let tx = tx.to_string();
                                        format!("Confirming {}...", &tx[..10])
                                    }
                                }}
                            </button>
                        </div>
                    </div>
                </form>
            </div>
        </div>
    }
}

/// One field of the edit form
#[component]
fn EditField(
    label: &'static str,
    get: fn(&PetUpdate) -> String,
    set: fn(&mut PetUpdate, String),
) -> impl IntoView {
    let pet_form = use_controller().pet_form;

    let value = move || match pet_form.get() {
        Some(PetForm::Edit { update, .. }) => get(&update),
        _ => String::new(),
    };

    view! {
        <div>
            <label class="block text-sm font-medium text-gray-700 mb-2">{label}</label>
            <input
                type="text"
                prop:value=value
                on:input=move |ev| {
                    let input = event_target_value(&ev);
                    pet_form.update(|form| {
                        if let Some(PetForm::Edit { update, .. }) = form {
                            set(update, input);
                        }
                    });
                }
                class="w-full px-4 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-purple-500"
            />
        </div>
    }
}

#[component]
fn NewOwnerField() -> impl IntoView {
    let pet_form = use_controller().pet_form;

    let value = move || match pet_form.get() {
        Some(PetForm::Transfer { new_owner, .. }) => new_owner,
        _ => String::new(),
    };

    view! {
        <div>
            <label class="block text-sm font-medium text-gray-700 mb-2">"New Owner Address *"</label>
            <input
                type="text"
                placeholder="0x..."
                prop:value=value
                on:input=move |ev| {
                    let input = event_target_value(&ev);
                    pet_form.update(|form| {
                        if let Some(PetForm::Transfer { new_owner, .. }) = form {
                            *new_owner = input;
                        }
                    });
                }
                class="w-full px-4 py-2 border border-gray-300 rounded-lg font-mono focus:ring-2 focus:ring-purple-500"
            />
        </div>
    }
}
