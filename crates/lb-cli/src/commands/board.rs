use std::fmt::Write as _;

use lb_api_types::LeadQuery;
use lb_client::HttpLeadService;
use lb_core::board::{Board, BoardOptions};
use lb_core::service::LeadService;
use lb_core::store::LeadStore;
use tracing::warn;

use super::friendly_error;

/// Run the `board` subcommand: fetch one page of leads and print it
/// grouped by stage.
pub async fn run(
    service: &HttpLeadService,
    query: LeadQuery,
    opts: BoardOptions,
) -> anyhow::Result<()> {
    let title = match query.campaign_id.as_deref() {
        Some(id) => match service.get_campaign(id).await {
            Ok(campaign) => Some(campaign.name),
            Err(e) => {
                warn!(campaign_id = id, error = %e, "campaign lookup failed");
                Some(format!("Campaign {id}"))
            }
        },
        None => None,
    };

    let page = service.list_leads(&query).await.map_err(friendly_error)?;
    let store = LeadStore::from_leads(page.leads);
    let board = store.board(opts);

    print!("{}", render(title.as_deref(), &board, page.total));
    Ok(())
}

/// Text rendering of a partitioned board.
pub fn render(title: Option<&str>, board: &Board<'_>, total: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title.unwrap_or("Pipeline"));
    let _ = writeln!(out, "{}", "-".repeat(60));

    for (column, leads) in board.columns() {
        let _ = writeln!(out, "{} ({})", column.label(), leads.len());
        if leads.is_empty() {
            let _ = writeln!(out, "  Empty");
        }
        for lead in leads {
            let hot = if lead.is_hot() { "*" } else { " " };
            let _ = writeln!(
                out,
                "  {:<24} {:>3}{hot}  {}",
                lead.display_name(),
                lead.score,
                lead.subtitle()
            );
        }
    }

    let _ = writeln!(out, "{}", "-".repeat(60));
    let shown = board.visible_count();
    let hidden = board.hidden().len();
    let _ = write!(out, "{shown} on board");
    if hidden > 0 {
        let _ = write!(out, ", {hidden} hidden (status not on board)");
    }
    let _ = writeln!(out, ", {total} total");
    out
}
