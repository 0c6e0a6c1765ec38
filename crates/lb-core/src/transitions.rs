//! Allowed status transitions.
//!
//! The board historically allowed any move. [`TransitionTable::unrestricted`]
//! keeps that; [`TransitionTable::forward_only`] is an explicit pipeline
//! table selected through `kanban.transition_policy`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Column, LeadStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    #[default]
    Unrestricted,
    ForwardOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    /// `None` permits every move onto a column status.
    pairs: Option<HashSet<(LeadStatus, LeadStatus)>>,
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::unrestricted()
    }
}

impl TransitionTable {
    pub fn unrestricted() -> Self {
        Self { pairs: None }
    }

    /// new/open → contacted → interested → qualified → closed.
    /// Same-stage drops are allowed; `closed` is terminal.
    pub fn forward_only() -> Self {
        let mut pairs = HashSet::new();
        for from in LeadStatus::KNOWN {
            for to in Column::ALL.map(|c| c.status()) {
                if pipeline_rank(&to) >= pipeline_rank(&from) {
                    pairs.insert((from.clone(), to));
                }
            }
        }
        Self { pairs: Some(pairs) }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (LeadStatus, LeadStatus)>) -> Self {
        Self {
            pairs: Some(pairs.into_iter().collect()),
        }
    }

    pub fn for_policy(policy: TransitionPolicy) -> Self {
        match policy {
            TransitionPolicy::Unrestricted => Self::unrestricted(),
            TransitionPolicy::ForwardOnly => Self::forward_only(),
        }
    }

    /// Targets must be a column status. A lead whose current status is
    /// unclassified has no pipeline position and may move anywhere.
    pub fn allows(&self, from: &LeadStatus, to: &LeadStatus) -> bool {
        if Column::for_status(to, false).is_none() {
            return false;
        }
        match &self.pairs {
            None => true,
            Some(_) if !from.is_known() => true,
            Some(pairs) => pairs.contains(&(from.clone(), to.clone())),
        }
    }
}

fn pipeline_rank(status: &LeadStatus) -> u8 {
    match status {
        LeadStatus::New | LeadStatus::Open => 0,
        LeadStatus::Contacted => 1,
        LeadStatus::Interested => 2,
        LeadStatus::Qualified => 3,
        LeadStatus::Closed => 4,
        LeadStatus::Unclassified(_) => 0,
    }
}
