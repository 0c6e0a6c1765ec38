use leptos::prelude::*;
use lb_core::drag::DragPayload;
use lb_core::types::{Lead, LeadStatus};
use wasm_bindgen::JsValue;
use web_sys::{DataTransfer, DragEvent};

use crate::state::use_board_state;

/// Accent colour for a status dot.
pub fn status_color_class(status: &LeadStatus) -> &'static str {
    match status {
        LeadStatus::New => "bg-blue-500",
        LeadStatus::Open => "bg-sky-500",
        LeadStatus::Contacted => "bg-amber-500",
        LeadStatus::Interested => "bg-emerald-500",
        LeadStatus::Qualified => "bg-purple-500",
        LeadStatus::Closed => "bg-slate-500",
        LeadStatus::Unclassified(_) => "bg-gray-400",
    }
}

pub fn score_badge_class(score: u8) -> &'static str {
    if score > 70 {
        "score-badge score-hot"
    } else {
        "score-badge score-warm"
    }
}

/// Put the drag payload on the event's transfer object.
pub fn write_drag_data(dt: &DataTransfer, payload: &DragPayload) -> Result<(), JsValue> {
    dt.set_data(payload.mime(), payload.data())?;
    dt.set_effect_allowed("move");
    Ok(())
}

#[component]
pub fn LeadCard(lead: Lead) -> impl IntoView {
    let state = use_board_state();
    let drag = state.drag;

    let id = lead.id.clone();
    let id_for_class = lead.id.clone();

    let on_dragstart = move |ev: DragEvent| {
        let payload: Option<DragPayload> = drag.try_update(|d| d.drag_start(id.clone()));
        if let (Some(dt), Some(payload)) = (ev.data_transfer(), payload) {
            if let Err(e) = write_drag_data(&dt, &payload) {
                leptos::logging::warn!("Failed to set drag data for lead {}: {e:?}", payload.data());
            }
        }
    };

    let on_dragend = move |_ev: DragEvent| {
        drag.update(|d| d.drag_end());
    };

    let card_class = move || {
        let dragging = drag.with(|d| d.dragging() == Some(&id_for_class));
        if dragging {
            "lead-card dragging"
        } else {
            "lead-card"
        }
    };

    let detail_href = format!("/leads/{}", lead.id);
    let dot_class = format!("status-dot {}", status_color_class(&lead.status));
    let added = lead
        .created_at
        .map(|t| format!("Added {}", t.format("%b %-d, %Y")));

    view! {
        <div
            class=card_class
            draggable="true"
            on:dragstart=on_dragstart
            on:dragend=on_dragend
        >
            <div class="lead-card-header">
                <span class=dot_class></span>
                <a class="lead-name" href=detail_href>{lead.display_name()}</a>
                <span class=score_badge_class(lead.score)>{lead.score}</span>
            </div>
            <div class="lead-subtitle">{lead.subtitle()}</div>
            {added.map(|text| view! { <div class="lead-added">{text}</div> })}
        </div>
    }
}
