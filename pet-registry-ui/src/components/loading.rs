//! Loading Component

use leptos::*;

/// Centered spinner with a caption
#[component]
pub fn Loading(#[prop(into)] label: String) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 text-gray-500">
            <div class="loading-spinner w-8 h-8 mb-3" />
            <span class="text-sm">{label}</span>
        </div>
    }
}

/// Inline loading spinner
#[component]
pub fn InlineLoading() -> impl IntoView {
    view! {
        <span class="inline-block loading-spinner w-4 h-4" />
    }
}
