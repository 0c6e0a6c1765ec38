//! Grouping of leads into the fixed kanban columns.
//!
//! The board is a view: it borrows leads from the store and is recomputed
//! whenever the store changes. Input order is preserved inside each column.

use crate::types::{Column, Lead, LeadId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardOptions {
    /// Render `open` leads under `New` instead of hiding them.
    pub open_as_new: bool,
}

#[derive(Debug, Clone)]
pub struct Board<'a> {
    columns: [Vec<&'a Lead>; 5],
    hidden: Vec<&'a Lead>,
}

impl<'a> Board<'a> {
    pub fn partition(leads: impl IntoIterator<Item = &'a Lead>, opts: BoardOptions) -> Self {
        let mut columns: [Vec<&'a Lead>; 5] = Default::default();
        let mut hidden = Vec::new();

        for lead in leads {
            match Column::for_status(&lead.status, opts.open_as_new) {
                Some(column) => columns[column.index()].push(lead),
                None => hidden.push(lead),
            }
        }

        if !hidden.is_empty() {
            tracing::debug!(
                hidden = hidden.len(),
                statuses = ?hidden.iter().map(|l| l.status.as_str()).collect::<Vec<_>>(),
                "leads with no matching column"
            );
        }

        Self { columns, hidden }
    }

    pub fn column(&self, column: Column) -> &[&'a Lead] {
        &self.columns[column.index()]
    }

    pub fn count(&self, column: Column) -> usize {
        self.columns[column.index()].len()
    }

    /// Columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = (Column, &[&'a Lead])> + '_ {
        Column::ALL
            .into_iter()
            .map(move |c| (c, self.columns[c.index()].as_slice()))
    }

    /// Leads whose status matches no column. They are not rendered.
    pub fn hidden(&self) -> &[&'a Lead] {
        &self.hidden
    }

    pub fn visible_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn column_of(&self, id: &LeadId) -> Option<Column> {
        self.columns()
            .find(|(_, leads)| leads.iter().any(|l| &l.id == id))
            .map(|(c, _)| c)
    }

    /// Rendered leads re-merged in column order.
    pub fn merged(&self) -> Vec<&'a Lead> {
        self.columns.iter().flatten().copied().collect()
    }
}
