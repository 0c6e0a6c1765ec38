use leptos::prelude::*;

pub mod api;
pub mod components;
pub mod pages;
pub mod state;

use wasm_bindgen::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    state::provide_board_state(state::UiSettings::from_location());

    view! {
        <div class="content">
            <pages::kanban::KanbanPage />
        </div>
        <components::toast::ToastStack />
    }
}

#[wasm_bindgen(start)]
pub fn mount() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
