//! App Root Component

use leptos::*;

use pet_registry::view::PetListState;

use crate::components::{
    Header, Loading, PetCard, PetFormModal, RegisterModal, SearchSection, Toast,
};
use crate::state::provide_controller;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let controller = provide_controller();
    let view = controller.view;
    let show_register = controller.show_register;
    let pet_form = controller.pet_form;

    view! {
        <div class="min-h-screen bg-gradient-to-br from-blue-50 via-white to-purple-50">
            <Header />

            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                {move || if view.with(|v| v.is_connected()) {
                    view! {
                        <SearchSection />
                        <MyPets />
                    }.into_view()
                } else {
                    view! { <Welcome /> }.into_view()
                }}
            </div>

            {move || show_register.get().then(|| view! { <RegisterModal /> })}
            {move || pet_form.with(Option::is_some).then(|| view! { <PetFormModal /> })}

            <Toast />
        </div>
    }
}

#[component]
fn Welcome() -> impl IntoView {
    view! {
        <div class="text-center py-20">
            <h2 class="text-3xl font-bold mb-4">"Welcome to Pet Registry"</h2>
            <p class="text-lg text-gray-600">"Connect your wallet to get started."</p>
        </div>
    }
}

/// The connected account's pets
#[component]
fn MyPets() -> impl IntoView {
    let controller = crate::state::use_controller();
    let view = controller.view;

    view! {
        <h2 class="text-2xl font-bold text-gray-900 mb-6">
            {move || format!("My Pets ({})", view.with(|v| v.pets().len()))}
        </h2>

        {move || match view.with(|v| v.pets.clone()) {
            PetListState::Idle | PetListState::Loading => {
                view! { <Loading label="Loading pets..." /> }.into_view()
            }
            PetListState::Failed(error) => view! {
                <div class="text-center bg-white rounded-xl py-12 shadow text-red-600">
                    <p>{format!("Could not load your pets: {}", error)}</p>
                </div>
            }.into_view(),
            PetListState::Loaded(pets) if pets.is_empty() => view! {
                <div class="text-center bg-white rounded-xl py-12 shadow">
                    <p>"No pets registered yet."</p>
                </div>
            }.into_view(),
            PetListState::Loaded(pets) => view! {
                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                    {pets.into_iter().map(|pet| view! { <PetCard pet=pet owned=true /> }).collect_view()}
                </div>
            }.into_view(),
        }}
    }
}
