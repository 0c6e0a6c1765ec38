use lb_api_types::ApiLeadStats;
use lb_client::HttpLeadService;
use lb_core::service::LeadService;

use super::friendly_error;

/// Run the `stats` subcommand: print totals per status and the average score.
pub async fn run(service: &HttpLeadService) -> anyhow::Result<()> {
    let stats = service.stats().await.map_err(friendly_error)?;
    print!("{}", render(&stats));
    Ok(())
}

pub fn render(stats: &ApiLeadStats) -> String {
    let mut out = String::new();
    out.push_str("Lead stats\n");
    out.push_str(&format!("{}\n", "-".repeat(40)));
    out.push_str(&format!("Total leads:   {}\n", stats.total));
    out.push_str(&format!("Average score: {:.1}\n", stats.avg_score));
    out.push_str("By status:\n");
    for (status, count) in &stats.by_status {
        out.push_str(&format!("  {status:<12} {count}\n"));
    }
    if let Some(by_enrichment) = &stats.by_enrichment {
        out.push_str("By enrichment:\n");
        for (state, count) in by_enrichment {
            out.push_str(&format!("  {state:<12} {count}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    use super::super::test_support::serve;
    use super::*;

    #[tokio::test]
    async fn stats_displays_totals() {
        let app = Router::new().route(
            "/api/leads/stats",
            get(|| async {
                Json(json!({
                    "total": 4,
                    "by_status": {"new": 3, "closed": 1},
                    "avg_score": 57.5
                }))
            }),
        );
        let url = serve(app).await;
        let service = HttpLeadService::new(&url).unwrap();

        let stats = service.stats().await.unwrap();
        let text = render(&stats);
        assert!(text.contains("Total leads:   4"));
        assert!(text.contains("Average score: 57.5"));
        assert!(text.contains("  new          3"));
        assert!(!text.contains("By enrichment"));

        assert!(run(&service).await.is_ok());
    }
}
