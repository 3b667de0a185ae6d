//! Toast Notification Component
//!
//! Shows the coordinator's current notice. Info notices clear themselves;
//! warnings and errors stay a little longer. Clicking dismisses.

use leptos::*;

use pet_registry::view::Notice;

use crate::state::use_controller;

#[component]
pub fn Toast() -> impl IntoView {
    let controller = use_controller();
    let view = controller.view;

    let expiring = controller.clone();
    create_effect(move |_| {
        if let Some(notice) = view.with(|v| v.notice.clone()) {
            let millis = match notice {
                Notice::Info(_) => 3000,
                Notice::Warning(_) | Notice::Error(_) => 5000,
            };
            expiring.expire_notice(notice, millis);
        }
    });

    view! {
        <div class="fixed bottom-6 right-4 z-50 space-y-2">
            {move || {
                let controller = controller.clone();
                view.with(|v| v.notice.clone()).map(|notice| view! {
                    <ToastMessage
                        notice=notice
                        on_dismiss=move || controller.dismiss_notice()
                    />
                })
            }}
        </div>
    }
}

#[component]
fn ToastMessage(notice: Notice, on_dismiss: impl Fn() + 'static) -> impl IntoView {
    let (icon, bg_class) = match notice {
        Notice::Info(_) => ("✓", "bg-green-600"),
        Notice::Warning(_) => ("⚠", "bg-yellow-600"),
        Notice::Error(_) => ("✕", "bg-red-600"),
    };

    view! {
        <div
            on:click=move |_| on_dismiss()
            class=format!(
                "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
                 cursor-pointer transform transition-all duration-300 ease-out animate-slide-in",
                bg_class
            )
        >
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{notice.message()}</span>
        </div>
    }
}
