// =============================================================================
// component_tests.rs - leadboard browser board unit tests
//
// Covers card styling helpers, drag data, URL settings parsing and the fetch
// helpers' pure parts. Runs via wasm-bindgen-test in a headless browser.
//
// Run with:
//   cd app/leptos-ui && wasm-pack test --headless --chrome
// =============================================================================

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use lb_api_types::LeadQuery;
use lb_core::orchestrator::ReconcileMode;
use lb_core::transitions::TransitionTable;
use lb_core::types::LeadStatus;
use lb_leptos_ui::api::{error_message, query_string};
use lb_core::drag::{DragController, DRAG_MIME};
use lb_leptos_ui::components::lead_card::{score_badge_class, status_color_class, write_drag_data};
use lb_leptos_ui::state::UiSettings;

mod drag_data {
    use super::*;

    #[wasm_bindgen_test]
    fn dragstart_allows_move_and_carries_lead_id() {
        let dt = web_sys::DataTransfer::new().unwrap();
        let payload = DragController::new().drag_start("42");

        write_drag_data(&dt, &payload).unwrap();

        assert_eq!(dt.effect_allowed(), "move");
        assert_eq!(dt.get_data(DRAG_MIME).unwrap(), "42");
    }
}

mod card_styling {
    use super::*;

    #[wasm_bindgen_test]
    fn status_colors() {
        assert_eq!(status_color_class(&LeadStatus::New), "bg-blue-500");
        assert_eq!(status_color_class(&LeadStatus::Open), "bg-sky-500");
        assert_eq!(status_color_class(&LeadStatus::Contacted), "bg-amber-500");
        assert_eq!(status_color_class(&LeadStatus::Interested), "bg-emerald-500");
        assert_eq!(status_color_class(&LeadStatus::Qualified), "bg-purple-500");
        assert_eq!(status_color_class(&LeadStatus::Closed), "bg-slate-500");
        assert_eq!(
            status_color_class(&LeadStatus::parse(Some("Weird_Value"))),
            "bg-gray-400"
        );
    }

    #[wasm_bindgen_test]
    fn score_badge_threshold_is_exclusive() {
        assert_eq!(score_badge_class(71), "score-badge score-hot");
        assert_eq!(score_badge_class(70), "score-badge score-warm");
        assert_eq!(score_badge_class(0), "score-badge score-warm");
    }
}

mod settings {
    use super::*;

    #[wasm_bindgen_test]
    fn defaults_without_params() {
        let s = UiSettings::from_pairs(Vec::<(String, String)>::new());
        assert_eq!(s, UiSettings::default());
        assert_eq!(s.api_base, "http://localhost:8000");
        assert_eq!(s.page_limit, 100);
        assert_eq!(s.reconcile, ReconcileMode::Rollback);
    }

    #[wasm_bindgen_test]
    fn params_override_defaults() {
        let s = UiSettings::from_pairs([
            ("api", "https://crm.example.com/"),
            ("campaign", "c-42"),
            ("limit", "1000"),
            ("reconcile", "keep"),
            ("policy", "forward_only"),
            ("open_as_new", "1"),
        ]);
        assert_eq!(s.api_base, "https://crm.example.com");
        assert_eq!(s.campaign_id.as_deref(), Some("c-42"));
        assert_eq!(s.page_limit, 500);
        assert_eq!(s.reconcile, ReconcileMode::Keep);
        assert_eq!(s.transitions, TransitionTable::forward_only());
        assert!(s.board.open_as_new);
    }

    #[wasm_bindgen_test]
    fn junk_values_are_ignored() {
        let s = UiSettings::from_pairs([("limit", "many"), ("reconcile", "retry"), ("campaign", " ")]);
        assert_eq!(s.page_limit, 100);
        assert_eq!(s.reconcile, ReconcileMode::Rollback);
        assert_eq!(s.campaign_id, None);
    }
}

mod fetch_helpers {
    use super::*;

    #[wasm_bindgen_test]
    fn query_string_encodes_and_skips_blanks() {
        let q = LeadQuery {
            campaign_id: Some("c 1".into()),
            limit: Some(100),
            search: Some("".into()),
            ..Default::default()
        };
        assert_eq!(query_string(&q), "?campaign_id=c%201&limit=100");
        assert_eq!(query_string(&LeadQuery::default()), "");
    }

    #[wasm_bindgen_test]
    fn error_message_prefers_body_detail() {
        assert_eq!(error_message(r#"{"detail":"Lead not found"}"#, "Not Found"), "Lead not found");
        assert_eq!(error_message(r#"{"error":"db down"}"#, ""), "db down");
        assert_eq!(error_message("<html>", "Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message("", ""), "request failed");
    }
}
