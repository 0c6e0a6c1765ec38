use lb_core::config::Config;
use lb_core::orchestrator::ReconcileMode;
use lb_core::transitions::{TransitionPolicy, TransitionTable};

#[test]
fn default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.general.log_level, "info");
    assert_eq!(cfg.api.base_url, "http://localhost:8000");
    assert_eq!(cfg.api.timeout_secs, None);
    assert_eq!(cfg.api.token_env, "LEADBOARD_API_TOKEN");
    assert_eq!(cfg.kanban.page_limit, 100);
    assert_eq!(cfg.kanban.reconcile, ReconcileMode::Rollback);
    assert_eq!(cfg.kanban.transition_policy, TransitionPolicy::Unrestricted);
    assert!(!cfg.kanban.open_as_new);
    assert_eq!(cfg.kanban.toast_ms, 4000);
    cfg.validate().expect("defaults validate");
}

#[test]
fn config_roundtrip() {
    let cfg = Config::default();
    let toml_str = cfg.to_toml().expect("serialize to toml");
    assert!(toml_str.contains("localhost:8000"));
    assert!(toml_str.contains("reconcile = \"rollback\""));

    let parsed: Config = toml::from_str(&toml_str).expect("parse toml back");
    assert_eq!(parsed.api.base_url, cfg.api.base_url);
    assert_eq!(parsed.kanban.page_limit, cfg.kanban.page_limit);
    parsed.validate().expect("config validates");
}

#[test]
fn config_partial_toml() {
    let partial = r#"
[api]
base_url = "https://crm.example.com"
timeout_secs = 15

[kanban]
reconcile = "keep"
transition_policy = "forward_only"
open_as_new = true
"#;
    let cfg: Config = toml::from_str(partial).expect("parse partial");
    assert_eq!(cfg.api.base_url, "https://crm.example.com");
    assert_eq!(cfg.api.timeout_secs, Some(15));
    assert_eq!(cfg.kanban.reconcile, ReconcileMode::Keep);
    assert_eq!(cfg.kanban.transitions(), TransitionTable::forward_only());
    assert!(cfg.kanban.board_options().open_as_new);
    // defaults should fill in the rest
    assert_eq!(cfg.general.log_level, "info");
    assert_eq!(cfg.kanban.page_limit, 100);
    cfg.validate().expect("config validates");
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[kanban]\npage_limit = 25\n").unwrap();

    let cfg = Config::load_from(&path).expect("load");
    assert_eq!(cfg.kanban.page_limit, 25);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from(dir.path().join("absent.toml")).expect_err("should fail");
    assert!(err.to_string().starts_with("io:"));
}

#[test]
fn unknown_reconcile_mode_fails_to_parse() {
    let err = toml::from_str::<Config>("[kanban]\nreconcile = \"retry\"\n");
    assert!(err.is_err());
}

#[test]
fn invalid_page_limit_fails_validation() {
    let mut cfg = Config::default();
    cfg.kanban.page_limit = 0;
    let err = cfg.validate().expect_err("validation should fail");
    assert!(err.to_string().contains("page_limit"));

    cfg.kanban.page_limit = 501;
    assert!(cfg.validate().is_err());
}

#[test]
fn invalid_base_url_fails_validation() {
    let mut cfg = Config::default();
    cfg.api.base_url = "localhost:8000".to_string();
    let err = cfg.validate().expect_err("validation should fail");
    assert!(err.to_string().contains("base_url"));
}

#[test]
fn zero_timeout_fails_validation() {
    let mut cfg = Config::default();
    cfg.api.timeout_secs = Some(0);
    assert!(cfg.validate().is_err());
}
