use lb_client::HttpLeadService;
use lb_core::service::LeadService;
use lb_core::types::{Lead, LeadId};

use super::friendly_error;

/// Run the `show` subcommand: fetch one lead and print its details.
pub async fn run(service: &HttpLeadService, lead: &str) -> anyhow::Result<()> {
    let lead = service
        .get_lead(&LeadId::from(lead))
        .await
        .map_err(friendly_error)?;
    print!("{}", render(&lead));
    Ok(())
}

pub fn render(lead: &Lead) -> String {
    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let hot = if lead.is_hot() { " (hot)" } else { "" };
    let created = lead
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut out = String::new();
    out.push_str(&format!("{}  [{}]\n", lead.display_name(), lead.id));
    out.push_str(&format!("{}\n", lead.subtitle()));
    out.push_str(&format!("{}\n", "-".repeat(40)));
    out.push_str(&format!("Status:      {}\n", lead.status));
    out.push_str(&format!("Score:       {}{hot}\n", lead.score));
    out.push_str(&format!("Email:       {}\n", dash(&lead.email)));
    out.push_str(&format!("Phone:       {}\n", dash(&lead.phone)));
    out.push_str(&format!("LinkedIn:    {}\n", dash(&lead.linkedin_url)));
    out.push_str(&format!("Source:      {}\n", dash(&lead.source)));
    out.push_str(&format!("Enrichment:  {}\n", dash(&lead.enrichment_status)));
    out.push_str(&format!("Created:     {created}\n"));
    out
}
