use leptos::prelude::*;

use crate::state::use_board_state;

/// Stack of transient notifications; click to dismiss early.
#[component]
pub fn ToastStack() -> impl IntoView {
    let state = use_board_state();

    view! {
        <div class="toast-stack" role="status" aria-live="polite">
            {move || {
                state.toasts.get().into_iter().map(|toast| {
                    let id = toast.id;
                    let class = format!("toast toast-{}", toast.note.level.as_str());
                    view! {
                        <div class=class on:click=move |_| state.dismiss_toast(id)>
                            {toast.note.message}
                        </div>
                    }
                }).collect::<Vec<_>>()
            }}
        </div>
    }
}
