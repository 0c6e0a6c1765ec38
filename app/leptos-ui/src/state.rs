use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use lb_core::board::BoardOptions;
use lb_core::drag::DragController;
use lb_core::notify::Notification;
use lb_core::orchestrator::ReconcileMode;
use lb_core::store::LeadStore;
use lb_core::transitions::{TransitionPolicy, TransitionTable};

/// Board settings, read from the page URL
/// (`?campaign=..&api=..&reconcile=keep&policy=forward_only&open_as_new=1`).
#[derive(Debug, Clone, PartialEq)]
pub struct UiSettings {
    pub api_base: String,
    pub campaign_id: Option<String>,
    pub page_limit: u32,
    pub toast_ms: u32,
    pub board: BoardOptions,
    pub reconcile: ReconcileMode,
    pub transitions: TransitionTable,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            campaign_id: None,
            page_limit: 100,
            toast_ms: 4000,
            board: BoardOptions::default(),
            reconcile: ReconcileMode::default(),
            transitions: TransitionTable::unrestricted(),
        }
    }
}

impl UiSettings {
    /// Apply `key=value` pairs over the defaults. Unknown keys and
    /// unparsable values are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "api" if !value.is_empty() => {
                    settings.api_base = value.trim_end_matches('/').to_string();
                }
                "campaign" | "campaign_id" if !value.is_empty() => {
                    settings.campaign_id = Some(value.to_string());
                }
                "limit" => {
                    if let Ok(limit) = value.parse::<u32>() {
                        settings.page_limit = limit.clamp(1, 500);
                    }
                }
                "toast_ms" => {
                    if let Ok(ms) = value.parse::<u32>() {
                        settings.toast_ms = ms.max(1);
                    }
                }
                "open_as_new" => {
                    settings.board.open_as_new = matches!(value, "1" | "true" | "yes");
                }
                "reconcile" => {
                    settings.reconcile = match value {
                        "keep" => ReconcileMode::Keep,
                        "refetch" => ReconcileMode::Refetch,
                        "rollback" => ReconcileMode::Rollback,
                        _ => settings.reconcile,
                    };
                }
                "policy" => {
                    let policy = match value {
                        "forward_only" => TransitionPolicy::ForwardOnly,
                        _ => TransitionPolicy::Unrestricted,
                    };
                    settings.transitions = TransitionTable::for_policy(policy);
                }
                _ => {}
            }
        }
        settings
    }

    pub fn from_location() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let Ok(params) = web_sys::UrlSearchParams::new_with_str(&search) else {
            return Self::default();
        };
        let keys = [
            "api",
            "campaign",
            "campaign_id",
            "limit",
            "toast_ms",
            "open_as_new",
            "reconcile",
            "policy",
        ];
        Self::from_pairs(
            keys.into_iter()
                .filter_map(|k| params.get(k).map(|v| (k, v))),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub note: Notification,
}

#[derive(Clone, Copy)]
pub struct BoardState {
    pub leads: RwSignal<LeadStore>,
    pub drag: RwSignal<DragController>,
    pub toasts: RwSignal<Vec<Toast>>,
    pub loading: RwSignal<bool>,
    pub load_error: RwSignal<Option<String>>,
    pub campaign_name: RwSignal<Option<String>>,
    pub settings: StoredValue<UiSettings>,
    next_toast: StoredValue<u64>,
}

impl BoardState {
    pub fn new(settings: UiSettings) -> Self {
        Self {
            leads: RwSignal::new(LeadStore::new()),
            drag: RwSignal::new(DragController::new()),
            toasts: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            load_error: RwSignal::new(None),
            campaign_name: RwSignal::new(None),
            settings: StoredValue::new(settings),
            next_toast: StoredValue::new(0),
        }
    }

    /// Show a toast and schedule its dismissal.
    pub fn push_toast(&self, note: Notification) {
        let id = self.next_toast.get_value();
        self.next_toast.set_value(id + 1);
        self.toasts.update(|toasts| toasts.push(Toast { id, note }));

        let toasts = self.toasts;
        let delay = self.settings.with_value(|s| s.toast_ms);
        leptos::task::spawn_local(async move {
            TimeoutFuture::new(delay).await;
            toasts.update(|t| t.retain(|toast| toast.id != id));
        });
    }

    pub fn dismiss_toast(&self, id: u64) {
        self.toasts.update(|t| t.retain(|toast| toast.id != id));
    }
}

pub fn provide_board_state(settings: UiSettings) -> BoardState {
    let state = BoardState::new(settings);
    provide_context(state);
    state
}

pub fn use_board_state() -> BoardState {
    expect_context::<BoardState>()
}
