//! Client-side lead cache.
//!
//! Keyed by [`LeadId`] with fetch order preserved. Status mutations go
//! through one protocol: [`LeadStore::apply_optimistic`] hands out a
//! [`PendingChange`], which is later settled with [`LeadStore::confirm`] or
//! [`LeadStore::rollback`]. Every write bumps a per-lead revision so that a
//! late rollback can never overwrite a newer local write.

use std::collections::HashMap;

use crate::board::{Board, BoardOptions};
use crate::types::{Lead, LeadId, LeadStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("lead {0} is not loaded")]
    UnknownLead(LeadId),
}

/// An optimistic status write awaiting the backend's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    pub lead_id: LeadId,
    pub previous: LeadStatus,
    pub applied: LeadStatus,
    revision: u64,
}

impl PendingChange {
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[derive(Debug, Clone)]
struct Entry {
    lead: Lead,
    revision: u64,
}

#[derive(Debug, Clone, Default)]
pub struct LeadStore {
    entries: HashMap<LeadId, Entry>,
    order: Vec<LeadId>,
    next_revision: u64,
}

impl LeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_leads(leads: impl IntoIterator<Item = Lead>) -> Self {
        let mut store = Self::new();
        store.replace_all(leads);
        store
    }

    /// Replace the cached page with a fresh fetch. Previously cached leads
    /// are evicted. A duplicated id keeps its first position and the last
    /// record received.
    pub fn replace_all(&mut self, leads: impl IntoIterator<Item = Lead>) {
        self.entries.clear();
        self.order.clear();
        for lead in leads {
            let revision = self.bump();
            let id = lead.id.clone();
            if self.entries.insert(id.clone(), Entry { lead, revision }).is_none() {
                self.order.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &LeadId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &LeadId) -> Option<&Lead> {
        self.entries.get(id).map(|e| &e.lead)
    }

    pub fn revision(&self, id: &LeadId) -> Option<u64> {
        self.entries.get(id).map(|e| e.revision)
    }

    /// Leads in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = &Lead> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entries.get(id).map(|e| &e.lead))
    }

    pub fn to_vec(&self) -> Vec<Lead> {
        self.iter().cloned().collect()
    }

    pub fn board(&self, opts: BoardOptions) -> Board<'_> {
        Board::partition(self.iter(), opts)
    }

    /// Write `status` locally before the backend confirms it.
    pub fn apply_optimistic(
        &mut self,
        id: &LeadId,
        status: LeadStatus,
    ) -> Result<PendingChange, StoreError> {
        let revision = self.bump();
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownLead(id.clone()))?;

        let previous = std::mem::replace(&mut entry.lead.status, status.clone());
        entry.revision = revision;

        Ok(PendingChange {
            lead_id: id.clone(),
            previous,
            applied: status,
            revision,
        })
    }

    /// The backend accepted the write. Nothing to change locally; returns
    /// whether the confirmed write is still the one displayed.
    pub fn confirm(&self, change: &PendingChange) -> bool {
        self.revision(&change.lead_id) == Some(change.revision)
    }

    /// Undo `change` if no later write has touched the lead since.
    /// Returns true when the previous status was restored.
    pub fn rollback(&mut self, change: &PendingChange) -> bool {
        let revision = self.bump();
        match self.entries.get_mut(&change.lead_id) {
            Some(entry) if entry.revision == change.revision => {
                entry.lead.status = change.previous.clone();
                entry.revision = revision;
                true
            }
            _ => false,
        }
    }

    /// Overwrite a cached lead with an authoritative copy from the backend.
    /// Leads that are not loaded are ignored.
    pub fn reconcile(&mut self, lead: Lead) -> bool {
        let revision = self.bump();
        match self.entries.get_mut(&lead.id) {
            Some(entry) => {
                entry.lead = lead;
                entry.revision = revision;
                true
            }
            None => false,
        }
    }

    /// [`reconcile`](Self::reconcile), but only while `change` is still the
    /// latest local write for the lead. A newer optimistic write is kept.
    pub fn reconcile_if_current(&mut self, change: &PendingChange, lead: Lead) -> bool {
        if lead.id != change.lead_id || self.revision(&change.lead_id) != Some(change.revision) {
            return false;
        }
        self.reconcile(lead)
    }

    fn bump(&mut self) -> u64 {
        self.next_revision += 1;
        self.next_revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn store() -> LeadStore {
        LeadStore::from_leads([
            Lead::new("1", LeadStatus::New),
            Lead::new("2", LeadStatus::Contacted),
        ])
    }

    #[test]
    fn keeps_fetch_order() {
        let s = LeadStore::from_leads([
            Lead::new("b", LeadStatus::New),
            Lead::new("a", LeadStatus::New),
            Lead::new("c", LeadStatus::New),
        ]);
        let ids: Vec<&str> = s.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn duplicate_ids_keep_first_position_and_last_record() {
        let s = LeadStore::from_leads([
            Lead::new("1", LeadStatus::New),
            Lead::new("2", LeadStatus::New),
            Lead::new("1", LeadStatus::Closed),
        ]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.iter().next().unwrap().status, LeadStatus::Closed);
    }

    #[test]
    fn replace_all_evicts_previous_page() {
        let mut s = store();
        s.replace_all([Lead::new("9", LeadStatus::New)]);
        assert!(!s.contains(&"1".into()));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn optimistic_write_is_visible_immediately() {
        let mut s = store();
        let change = s.apply_optimistic(&"1".into(), LeadStatus::Qualified).unwrap();
        assert_eq!(change.previous, LeadStatus::New);
        assert_eq!(s.get(&"1".into()).unwrap().status, LeadStatus::Qualified);

        let board = s.board(BoardOptions::default());
        assert_eq!(board.column_of(&"1".into()), Some(Column::Qualified));
        assert_eq!(board.count(Column::New), 0);
    }

    #[test]
    fn unknown_lead_is_an_error() {
        let mut s = store();
        let err = s.apply_optimistic(&"nope".into(), LeadStatus::New).unwrap_err();
        assert_eq!(err, StoreError::UnknownLead("nope".into()));
    }

    #[test]
    fn rollback_restores_previous_status() {
        let mut s = store();
        let change = s.apply_optimistic(&"1".into(), LeadStatus::Closed).unwrap();
        assert!(s.rollback(&change));
        assert_eq!(s.get(&"1".into()).unwrap().status, LeadStatus::New);
    }

    #[test]
    fn stale_rollback_does_not_clobber_newer_write() {
        let mut s = store();
        let first = s.apply_optimistic(&"1".into(), LeadStatus::Interested).unwrap();
        let second = s.apply_optimistic(&"1".into(), LeadStatus::Closed).unwrap();
        assert_eq!(second.previous, LeadStatus::Interested);

        assert!(!s.rollback(&first));
        assert_eq!(s.get(&"1".into()).unwrap().status, LeadStatus::Closed);
        assert!(!s.confirm(&first));
        assert!(s.confirm(&second));
    }

    #[test]
    fn reconcile_replaces_record_and_invalidates_pending() {
        let mut s = store();
        let change = s.apply_optimistic(&"2".into(), LeadStatus::Closed).unwrap();
        let mut server = Lead::new("2", LeadStatus::Contacted);
        server.score = 55;
        assert!(s.reconcile(server));
        assert_eq!(s.get(&"2".into()).unwrap().score, 55);
        assert!(!s.rollback(&change));
        assert!(!s.reconcile(Lead::new("404", LeadStatus::New)));
    }

    #[test]
    fn stale_refetch_keeps_newer_write() {
        let mut s = store();
        let first = s.apply_optimistic(&"1".into(), LeadStatus::Interested).unwrap();
        let second = s.apply_optimistic(&"1".into(), LeadStatus::Closed).unwrap();

        assert!(!s.reconcile_if_current(&first, Lead::new("1", LeadStatus::New)));
        assert_eq!(s.get(&"1".into()).unwrap().status, LeadStatus::Closed);
        assert!(s.confirm(&second));

        let mut server = Lead::new("1", LeadStatus::Contacted);
        server.score = 12;
        assert!(s.reconcile_if_current(&second, server));
        assert_eq!(s.get(&"1".into()).unwrap().status, LeadStatus::Contacted);
    }

    #[test]
    fn refetch_for_another_lead_is_ignored() {
        let mut s = store();
        let change = s.apply_optimistic(&"1".into(), LeadStatus::Closed).unwrap();
        assert!(!s.reconcile_if_current(&change, Lead::new("2", LeadStatus::New)));
        assert_eq!(s.get(&"2".into()).unwrap().status, LeadStatus::Contacted);
    }
}
