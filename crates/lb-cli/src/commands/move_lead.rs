use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use lb_api_types::LeadQuery;
use lb_client::HttpLeadService;
use lb_core::config::KanbanConfig;
use lb_core::notify;
use lb_core::orchestrator::{ChangeOutcome, StatusChangeOrchestrator};
use lb_core::service::LeadService;
use lb_core::store::LeadStore;
use lb_core::types::{LeadId, LeadStatus};

use super::{format_notification, friendly_error};

/// Run the `move` subcommand. Fails unless the backend confirmed the change.
pub async fn run(
    service: Arc<HttpLeadService>,
    kanban: &KanbanConfig,
    lead: &str,
    status: &str,
    campaign: Option<String>,
) -> anyhow::Result<()> {
    let target: LeadStatus = status.parse()?;
    let id = LeadId::from(lead);

    let mut leads = match campaign {
        Some(campaign_id) => {
            let query = LeadQuery {
                campaign_id: Some(campaign_id),
                limit: Some(kanban.page_limit),
                ..Default::default()
            };
            service
                .list_leads(&query)
                .await
                .map_err(friendly_error)?
                .leads
        }
        None => Vec::new(),
    };
    if !leads.iter().any(|l| l.id == id) {
        leads.push(service.get_lead(&id).await.map_err(friendly_error)?);
    }

    let store = Arc::new(Mutex::new(LeadStore::from_leads(leads)));
    let (tx, rx) = notify::channel();
    let orchestrator = StatusChangeOrchestrator::new(service, store.clone(), tx)
        .with_transitions(kanban.transitions())
        .with_reconcile(kanban.reconcile);

    let result = orchestrator.change_status(&id, target).await;
    for note in rx.try_iter() {
        println!("{}", format_notification(&note));
    }

    let outcome = result?;
    let column = store
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .board(kanban.board_options())
        .column_of(&id)
        .map(|c| c.label())
        .unwrap_or("(not on board)");

    match outcome {
        ChangeOutcome::Confirmed => {
            println!("{id} -> {column}");
            Ok(())
        }
        ChangeOutcome::RolledBack(err) => {
            Err(friendly_error(err)).context(format!("status change rolled back; {id} stays in {column}"))
        }
        ChangeOutcome::Refetched(err) => {
            Err(friendly_error(err)).context(format!("status change failed; {id} reloaded, now in {column}"))
        }
        ChangeOutcome::Kept(err) => Err(friendly_error(err)).context(format!(
            "status change was not saved; local copy left in {column}"
        )),
    }
}
