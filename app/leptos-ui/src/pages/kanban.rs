use leptos::prelude::*;
use lb_api_types::LeadQuery;
use lb_core::drag::{StatusChangeIntent, DRAG_MIME};
use lb_core::notify::Notification;
use lb_core::orchestrator::{begin_change, settle_failure, ChangeError, ReconcileMode};
use lb_core::types::{Column, Lead};
use web_sys::DragEvent;

use crate::api;
use crate::components::lead_card::{status_color_class, LeadCard};
use crate::state::{use_board_state, BoardState};

/// Load the campaign heading and one page of leads into the store.
fn load_board(state: BoardState) {
    let settings = state.settings.get_value();
    state.loading.set(true);
    state.load_error.set(None);

    leptos::task::spawn_local(async move {
        if let Some(campaign_id) = settings.campaign_id.as_deref() {
            match api::fetch_campaign(&settings.api_base, campaign_id).await {
                Ok(campaign) => state.campaign_name.set(Some(campaign.name)),
                Err(e) => leptos::logging::warn!("Failed to fetch campaign {campaign_id}: {e}"),
            }
        }

        let query = LeadQuery {
            campaign_id: settings.campaign_id.clone(),
            limit: Some(settings.page_limit),
            ..Default::default()
        };
        match api::fetch_leads(&settings.api_base, &query).await {
            Ok(page) => {
                let leads: Vec<Lead> = page.items.iter().map(Lead::from_api).collect();
                state.leads.update(|store| store.replace_all(leads));
            }
            Err(e) => {
                leptos::logging::warn!("Failed to fetch leads: {e}");
                state.load_error.set(Some(e.to_string()));
            }
        }
        state.loading.set(false);
    });
}

/// Optimistically apply a drop, then persist it. One PATCH per drop.
fn change_status(state: BoardState, intent: StatusChangeIntent) {
    let settings = state.settings.get_value();
    let StatusChangeIntent { lead_id, target } = intent;

    let started = state
        .leads
        .try_update(|store| begin_change(store, &settings.transitions, &lead_id, target));
    let pending = match started {
        Some(Ok(pending)) => pending,
        Some(Err(ChangeError::TransitionRejected { from, to })) => {
            state.push_toast(Notification::transition_rejected(&lead_id, &from, &to));
            return;
        }
        Some(Err(e)) => {
            leptos::logging::warn!("Ignoring drop of lead {lead_id}: {e}");
            return;
        }
        None => return,
    };

    leptos::task::spawn_local(async move {
        let base = settings.api_base.as_str();
        let Err(e) = api::update_lead_status(base, &pending.lead_id, &pending.applied).await else {
            state.leads.with_untracked(|store| store.confirm(&pending));
            state.push_toast(Notification::moved(&pending.lead_id, &pending.applied));
            return;
        };

        leptos::logging::warn!("Failed to update lead {}: {e}", pending.lead_id);
        state.push_toast(Notification::update_failed(&pending.lead_id));

        let refetched = match settings.reconcile {
            ReconcileMode::Refetch => match api::fetch_lead(base, &pending.lead_id).await {
                Ok(fresh) => Some(Lead::from_api(&fresh)),
                Err(e) => {
                    leptos::logging::warn!("Failed to refetch lead {}: {e}", pending.lead_id);
                    None
                }
            },
            _ => None,
        };
        state.leads.update(|store| {
            settle_failure(store, &pending, settings.reconcile, refetched);
        });
    });
}

#[component]
pub fn KanbanPage() -> impl IntoView {
    let state = use_board_state();
    let drag = state.drag;
    let leads = state.leads;
    let opts = state.settings.with_value(|s| s.board);

    load_board(state);

    let title = move || {
        state
            .campaign_name
            .get()
            .unwrap_or_else(|| "Pipeline".to_string())
    };

    let hidden_count = move || leads.with(|store| store.board(opts).hidden().len());

    view! {
        <div class="page-header">
            <h2>{title}</h2>
            <div class="page-header-actions">
                <button class="refresh-btn" on:click=move |_| load_board(state)>
                    "\u{21BB} Refresh"
                </button>
            </div>
        </div>

        {move || state.loading.get().then(|| view! {
            <div class="kanban-loading">"Loading leads..."</div>
        })}
        {move || state.load_error.get().map(|e| view! {
            <div class="kanban-error">{format!("Could not load leads: {e}")}</div>
        })}

        <div class="kanban">
            {Column::ALL.into_iter().map(|column| {
                let on_dragover = move |ev: DragEvent| {
                    ev.prevent_default();
                    drag.update(|d| d.drag_over(column));
                };

                let on_dragleave = move |_ev: DragEvent| {
                    drag.update(|d| d.drag_leave(column));
                };

                let on_drop = move |ev: DragEvent| {
                    ev.prevent_default();
                    let data = ev
                        .data_transfer()
                        .and_then(|dt| dt.get_data(DRAG_MIME).ok());
                    let intent = drag
                        .try_update(|d| d.drop(column, data.as_deref()))
                        .flatten();
                    if let Some(intent) = intent {
                        change_status(state, intent);
                    }
                };

                let col_class = move || {
                    let is_over = drag.with(|d| d.is_target(column) && d.dragging().is_some());
                    if is_over {
                        "kanban-column drop-target drag-over"
                    } else {
                        "kanban-column drop-target"
                    }
                };

                let count = move || leads.with(|store| store.board(opts).count(column));
                let dot_class = format!("status-dot {}", status_color_class(&column.status()));

                view! {
                    <div
                        class=col_class
                        on:dragover=on_dragover
                        on:dragleave=on_dragleave
                        on:drop=on_drop
                    >
                        <h3>
                            <span class=dot_class></span>
                            {column.label()}
                            " "
                            <span class="count">{count}</span>
                        </h3>
                        {move || {
                            let cards: Vec<Lead> = leads.with(|store| {
                                store
                                    .board(opts)
                                    .column(column)
                                    .iter()
                                    .map(|lead| (*lead).clone())
                                    .collect()
                            });
                            if cards.is_empty() {
                                return vec![view! {
                                    <div class="kanban-empty-state">"Empty"</div>
                                }.into_any()];
                            }
                            cards.into_iter()
                                .map(|lead| view! { <LeadCard lead=lead /> }.into_any())
                                .collect::<Vec<_>>()
                        }}
                    </div>
                }
            }).collect::<Vec<_>>()}
        </div>

        {move || {
            let hidden = hidden_count();
            (hidden > 0).then(|| view! {
                <div class="kanban-hidden-note">
                    {format!("{hidden} lead(s) have a status with no column and are not shown")}
                </div>
            })
        }}
    }
}
