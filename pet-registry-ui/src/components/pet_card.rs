//! Pet Card Component

use leptos::*;

use pet_registry::registry::PetUpdate;
use pet_registry::ViewPet;

use crate::state::{use_controller, PetForm};

/// One pet, as listed under "My Pets" or as a search result. Owned pets get
/// edit and transfer actions.
#[component]
pub fn PetCard(pet: ViewPet, #[prop(optional)] owned: bool) -> impl IntoView {
    let actions = owned.then(|| view! { <OwnerActions pet=pet.clone() /> });

    let image = match pet.image_url.clone() {
        Some(url) => view! {
            <img src=url alt=pet.name.clone() class="w-full h-full object-cover" />
        }
        .into_view(),
        None => view! { <span class="text-6xl text-purple-400">"♥"</span> }.into_view(),
    };

    view! {
        <div class="bg-white rounded-xl shadow-lg overflow-hidden hover:shadow-xl transition-shadow">
            <div class="aspect-video bg-gradient-to-br from-blue-100 to-purple-100 flex items-center justify-center">
                {image}
            </div>

            <div class="p-6">
                <div class="flex justify-between mb-3">
                    <h3 class="text-xl font-bold">{pet.name.clone()}</h3>
                    <span class="bg-blue-100 text-blue-800 px-3 py-1 rounded-full text-sm">
                        {format!("#{}", pet.id)}
                    </span>
                </div>

                <div class="space-y-2 text-sm text-gray-600 mb-4">
                    <p><strong>"Breed: "</strong>{pet.breed.clone()}</p>
                    <p>"Born: "{pet.birth_date.display()}</p>
                    <p title=pet.owner.to_string()>"Owner: "{pet.owner_short.clone()}</p>
                    <p>"Registered: "{pet.registration_date.display()}</p>
                    {(!pet.is_active).then(|| view! {
                        <p class="text-red-600">"Inactive"</p>
                    })}
                </div>

                {pet.description.clone().map(|text| view! {
                    <p class="text-sm text-gray-700">{text}</p>
                })}

                {actions}
            </div>
        </div>
    }
}

#[component]
fn OwnerActions(pet: ViewPet) -> impl IntoView {
    let controller = use_controller();
    let view = controller.view;
    let pet_form = controller.pet_form;
    let id = pet.id;

    let busy = move || view.with(|v| v.pet_action.pet() == Some(id));
    let update = PetUpdate::from(&pet);

    view! {
        <div class="flex gap-2 mt-4">
            <button
                disabled=busy
                on:click=move |_| pet_form.set(Some(PetForm::Edit { id, update: update.clone() }))
                class="bg-blue-600 text-white px-4 py-2 rounded-lg text-sm disabled:opacity-50"
            >
                "Edit Info"
            </button>
            <button
                disabled=busy
                on:click=move |_| pet_form.set(Some(PetForm::Transfer { id, new_owner: String::new() }))
                class="bg-purple-600 text-white px-4 py-2 rounded-lg text-sm disabled:opacity-50"
            >
                "Transfer"
            </button>
        </div>
    }
}
