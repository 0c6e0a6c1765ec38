pub mod board;
pub mod config;
pub mod drag;
pub mod notify;
pub mod orchestrator;
pub mod service;
pub mod store;
pub mod transitions;
pub mod types;
