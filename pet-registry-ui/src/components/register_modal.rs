//! Register Modal Component
//!
//! Registration form. Edits go straight to the coordinator's draft, so a
//! failed submission leaves the form as the user typed it.

use leptos::*;

use pet_registry::registry::RegisterDraft;
use pet_registry::view::RegistrationState;

use crate::state::{use_controller, Controller};

#[component]
pub fn RegisterModal() -> impl IntoView {
    let controller = use_controller();
    let view = controller.view;
    let show = controller.show_register;

    let busy = move || view.with(|v| v.is_registering());

    let on_submit = {
        let controller = controller.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            controller.register();
        }
    };

    view! {
        <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center p-4 z-50">
            <div class="bg-white rounded-xl shadow-2xl max-w-md w-full max-h-[90vh] overflow-y-auto">
                <form on:submit=on_submit class="p-6">
                    <h2 class="text-2xl font-bold text-gray-900 mb-6">"Register New Pet"</h2>

                    <div class="space-y-4">
                        <Field
                            label="Pet Name *"
                            input_type="text"
                            placeholder="e.g., Buddy"
                            controller=controller.clone()
                            get=|d| d.name.clone()
                            set=|d, v| d.name = v
                        />
                        <Field
                            label="Breed *"
                            input_type="text"
                            placeholder="e.g., Golden Retriever"
                            controller=controller.clone()
                            get=|d| d.breed.clone()
                            set=|d, v| d.breed = v
                        />
                        <Field
                            label="Birth Date *"
                            input_type="date"
                            placeholder=""
                            controller=controller.clone()
                            get=|d| d.birth_date.clone()
                            set=|d, v| d.birth_date = v
                        />
                        <Field
                            label="Image URL"
                            input_type="url"
                            placeholder="https://example.com/pet.jpg"
                            controller=controller.clone()
                            get=|d| d.image_url.clone()
                            set=|d, v| d.image_url = v
                        />

                        <div>
                            <label class="block text-sm font-medium text-gray-700 mb-2">"Description"</label>
                            <textarea
                                rows=3
                                placeholder="Tell us about your pet..."
                                prop:value=move || view.with(|v| v.draft.description.clone())
                                on:input={
                                    let controller = controller.clone();
                                    move |ev| {
                                        let value = event_target_value(&ev);
                                        controller.update_draft(|d| d.description = value);
                                    }
                                }
                                class="w-full px-4 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-purple-500"
                            />
                        </div>

                        <div class="flex gap-4 pt-4">
                            <button
                                type="button"
                                on:click=move |_| show.set(false)
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
                                {move || match view.with(|v| v.registration.clone()) {
                                    RegistrationState::Editing => "Register Pet".to_string(),
                                    RegistrationState::Submitting => "Waiting for signature...".to_string(),
                                    RegistrationState::Confirming { tx } => {
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

/// A single-line input bound to one draft field
#[component]
fn Field(
    label: &'static str,
    input_type: &'static str,
    placeholder: &'static str,
    controller: Controller,
    get: fn(&RegisterDraft) -> String,
    set: fn(&mut RegisterDraft, String),
) -> impl IntoView {
    let view = controller.view;

    view! {
        <div>
            <label class="block text-sm font-medium text-gray-700 mb-2">{label}</label>
            <input
                type=input_type
                placeholder=placeholder
                prop:value=move || view.with(|v| get(&v.draft))
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    controller.update_draft(|d| set(d, value));
                }
                class="w-full px-4 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-purple-500"
            />
        </div>
    }
}
