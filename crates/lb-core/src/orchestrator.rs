//! Optimistic status changes against the remote lead service.
//!
//! A change is split in two so callers can render between the halves:
//! [`StatusChangeOrchestrator::begin`] validates and writes locally,
//! [`StatusChangeOrchestrator::finish`] performs the single remote write and
//! settles the pending change according to the [`ReconcileMode`].
//!
//! Surfaces that cannot hold a [`LeadService`] (the browser board issues its
//! own requests) use the same rules through [`begin_change`] and
//! [`settle_failure`].

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::drag::StatusChangeIntent;
use crate::notify::{Notification, NotificationSender};
use crate::service::{LeadService, ServiceError};
use crate::store::{LeadStore, PendingChange, StoreError};
use crate::transitions::TransitionTable;
use crate::types::{Column, Lead, LeadId, LeadStatus};

pub type SharedStore = Arc<Mutex<LeadStore>>;

/// What to do locally when the remote write fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Restore the previous status unless a newer local write exists.
    #[default]
    Rollback,
    /// Fetch the lead again and take the server's copy.
    Refetch,
    /// Keep the optimistic status even though the server rejected it.
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChangeError {
    #[error("lead {0} is not loaded")]
    UnknownLead(LeadId),

    #[error("moving a lead from '{from}' to '{to}' is not allowed")]
    TransitionRejected { from: LeadStatus, to: LeadStatus },

    #[error("'{0}' is not a board column")]
    InvalidStatus(String),
}

impl From<StoreError> for ChangeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownLead(id) => ChangeError::UnknownLead(id),
        }
    }
}

/// How a started change ended. Remote failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    Confirmed,
    RolledBack(ServiceError),
    Refetched(ServiceError),
    Kept(ServiceError),
}

impl ChangeOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ChangeOutcome::Confirmed)
    }

    pub fn remote_error(&self) -> Option<&ServiceError> {
        match self {
            ChangeOutcome::Confirmed => None,
            ChangeOutcome::RolledBack(e) | ChangeOutcome::Refetched(e) | ChangeOutcome::Kept(e) => {
                Some(e)
            }
        }
    }
}

/// Local effect of settling a failed remote write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureSettlement {
    Kept,
    /// `restored` is false when a newer local write was left in place.
    RolledBack { restored: bool },
    /// `applied` is false when a newer local write was left in place.
    Refetched { applied: bool },
}

/// Validate a move against the store and apply it optimistically.
pub fn begin_change(
    store: &mut LeadStore,
    transitions: &TransitionTable,
    id: &LeadId,
    status: LeadStatus,
) -> Result<PendingChange, ChangeError> {
    if Column::for_status(&status, false).is_none() {
        return Err(ChangeError::InvalidStatus(status.to_string()));
    }

    let current = store
        .get(id)
        .map(|l| l.status.clone())
        .ok_or_else(|| ChangeError::UnknownLead(id.clone()))?;

    if !transitions.allows(&current, &status) {
        return Err(ChangeError::TransitionRejected {
            from: current,
            to: status,
        });
    }

    Ok(store.apply_optimistic(id, status)?)
}

/// Settle `pending` after its remote write failed.
///
/// `refetched` is the server copy when `mode` is [`ReconcileMode::Refetch`];
/// `None` there means the refetch failed too and the change is rolled back.
/// Neither path overwrites a newer local write to the same lead.
pub fn settle_failure(
    store: &mut LeadStore,
    pending: &PendingChange,
    mode: ReconcileMode,
    refetched: Option<Lead>,
) -> FailureSettlement {
    match (mode, refetched) {
        (ReconcileMode::Keep, _) => FailureSettlement::Kept,
        (ReconcileMode::Refetch, Some(lead)) => FailureSettlement::Refetched {
            applied: store.reconcile_if_current(pending, lead),
        },
        (ReconcileMode::Rollback | ReconcileMode::Refetch, _) => FailureSettlement::RolledBack {
            restored: store.rollback(pending),
        },
    }
}

pub struct StatusChangeOrchestrator<S> {
    service: Arc<S>,
    store: SharedStore,
    notifier: NotificationSender,
    transitions: TransitionTable,
    reconcile: ReconcileMode,
}

impl<S: LeadService> StatusChangeOrchestrator<S> {
    pub fn new(service: Arc<S>, store: SharedStore, notifier: NotificationSender) -> Self {
        Self {
            service,
            store,
            notifier,
            transitions: TransitionTable::unrestricted(),
            reconcile: ReconcileMode::default(),
        }
    }

    pub fn with_transitions(mut self, transitions: TransitionTable) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn with_reconcile(mut self, mode: ReconcileMode) -> Self {
        self.reconcile = mode;
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn reconcile_mode(&self) -> ReconcileMode {
        self.reconcile
    }

    /// Validate the move and apply it locally.
    pub fn begin(&self, id: &LeadId, status: LeadStatus) -> Result<PendingChange, ChangeError> {
        let result = begin_change(&mut self.lock(), &self.transitions, id, status);
        if let Err(ChangeError::TransitionRejected { from, to }) = &result {
            warn!(lead_id = %id, from = %from, to = %to, "transition rejected");
            self.notify(Notification::transition_rejected(id, from, to));
        }
        result
    }

    /// Issue the remote write for `pending` and settle it. Exactly one
    /// request is made; there is no retry.
    pub async fn finish(&self, pending: PendingChange) -> ChangeOutcome {
        let id = pending.lead_id.clone();

        let err = match self.service.update_status(&id, &pending.applied).await {
            Ok(()) => {
                let current = self.lock().confirm(&pending);
                info!(lead_id = %id, status = %pending.applied, current, "status updated");
                self.notify(Notification::moved(&id, &pending.applied));
                return ChangeOutcome::Confirmed;
            }
            Err(err) => err,
        };

        warn!(lead_id = %id, status = %pending.applied, error = %err, "status update failed");
        self.notify(Notification::update_failed(&id));

        let refetched = match self.reconcile {
            ReconcileMode::Refetch => match self.service.get_lead(&id).await {
                Ok(lead) => Some(lead),
                Err(refetch_err) => {
                    warn!(lead_id = %id, error = %refetch_err, "refetch failed, rolling back");
                    None
                }
            },
            _ => None,
        };

        let settlement = settle_failure(&mut self.lock(), &pending, self.reconcile, refetched);
        match settlement {
            FailureSettlement::Kept => ChangeOutcome::Kept(err),
            FailureSettlement::RolledBack { restored } => {
                info!(lead_id = %id, restored, "optimistic status rolled back");
                ChangeOutcome::RolledBack(err)
            }
            FailureSettlement::Refetched { applied } => {
                info!(lead_id = %id, applied, "lead refetched after failed update");
                ChangeOutcome::Refetched(err)
            }
        }
    }

    pub async fn change_status(
        &self,
        id: &LeadId,
        status: LeadStatus,
    ) -> Result<ChangeOutcome, ChangeError> {
        let pending = self.begin(id, status)?;
        Ok(self.finish(pending).await)
    }

    pub async fn apply_intent(
        &self,
        intent: StatusChangeIntent,
    ) -> Result<ChangeOutcome, ChangeError> {
        self.change_status(&intent.lead_id, intent.target).await
    }

    fn lock(&self) -> MutexGuard<'_, LeadStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, notification: Notification) {
        let _ = self.notifier.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> LeadStore {
        LeadStore::from_leads([Lead::new("1", LeadStatus::New)])
    }

    #[test]
    fn begin_change_rejects_non_column_status() {
        let mut s = store();
        let err = begin_change(
            &mut s,
            &TransitionTable::unrestricted(),
            &"1".into(),
            LeadStatus::Open,
        )
        .unwrap_err();
        assert_eq!(err, ChangeError::InvalidStatus("open".into()));
        assert_eq!(s.get(&"1".into()).unwrap().status, LeadStatus::New);
    }

    #[test]
    fn begin_change_applies_allowed_move() {
        let mut s = store();
        let pending = begin_change(
            &mut s,
            &TransitionTable::unrestricted(),
            &"1".into(),
            LeadStatus::Qualified,
        )
        .unwrap();
        assert_eq!(pending.previous, LeadStatus::New);
        assert_eq!(s.get(&"1".into()).unwrap().status, LeadStatus::Qualified);
    }

    #[test]
    fn settle_failure_per_mode() {
        let mut s = store();
        let pending = s.apply_optimistic(&"1".into(), LeadStatus::Closed).unwrap();
        assert_eq!(
            settle_failure(&mut s, &pending, ReconcileMode::Keep, None),
            FailureSettlement::Kept
        );
        assert_eq!(s.get(&"1".into()).unwrap().status, LeadStatus::Closed);

        assert_eq!(
            settle_failure(
                &mut s,
                &pending,
                ReconcileMode::Refetch,
                Some(Lead::new("1", LeadStatus::Contacted))
            ),
            FailureSettlement::Refetched { applied: true }
        );
        assert_eq!(s.get(&"1".into()).unwrap().status, LeadStatus::Contacted);

        let pending = s.apply_optimistic(&"1".into(), LeadStatus::Closed).unwrap();
        assert_eq!(
            settle_failure(&mut s, &pending, ReconcileMode::Refetch, None),
            FailureSettlement::RolledBack { restored: true }
        );
        assert_eq!(s.get(&"1".into()).unwrap().status, LeadStatus::Contacted);
    }
}
