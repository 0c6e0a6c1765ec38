//! Drag-and-drop gesture state for the kanban board.
//!
//! Framework independent: the browser board forwards native `dragstart`,
//! `dragover`, `dragleave`, `drop` and `dragend` events here, and the CLI
//! drives the same controller for `lb move`.

use crate::types::{Column, LeadId, LeadStatus};

/// Key the dragged lead id is stored under in the `DataTransfer` payload.
pub const DRAG_MIME: &str = "leadId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub lead_id: LeadId,
}

impl DragPayload {
    pub fn mime(&self) -> &'static str {
        DRAG_MIME
    }

    pub fn data(&self) -> &str {
        self.lead_id.as_str()
    }
}

/// A completed drop that should change a lead's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangeIntent {
    pub lead_id: LeadId,
    pub target: LeadStatus,
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    dragging: Option<LeadId>,
    active_target: Option<Column>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_start(&mut self, lead_id: impl Into<LeadId>) -> DragPayload {
        let lead_id = lead_id.into();
        tracing::debug!(lead_id = %lead_id, "drag start");
        self.dragging = Some(lead_id.clone());
        DragPayload { lead_id }
    }

    /// Highlight `column` as the drop target. No data is touched.
    pub fn drag_over(&mut self, column: Column) {
        self.active_target = Some(column);
    }

    pub fn drag_leave(&mut self, column: Column) {
        if self.active_target == Some(column) {
            self.active_target = None;
        }
    }

    /// Resolve a drop on `column`.
    ///
    /// `payload` is whatever the drag data carried; a drag that started
    /// outside the board has none and yields no intent. The drop-target
    /// marker is cleared in every case.
    pub fn drop(&mut self, column: Column, payload: Option<&str>) -> Option<StatusChangeIntent> {
        self.active_target = None;
        self.dragging = None;

        let lead_id = payload.map(str::trim).filter(|id| !id.is_empty())?;
        tracing::debug!(lead_id, column = column.label(), "drop");
        Some(StatusChangeIntent {
            lead_id: LeadId::new(lead_id),
            target: column.status(),
        })
    }

    /// Native drag cancellation (e.g. Esc) or a drop outside any column.
    pub fn drag_end(&mut self) {
        self.dragging = None;
        self.active_target = None;
    }

    pub fn dragging(&self) -> Option<&LeadId> {
        self.dragging.as_ref()
    }

    pub fn active_target(&self) -> Option<Column> {
        self.active_target
    }

    /// True when `column` should render as the highlighted drop target.
    pub fn is_target(&self, column: Column) -> bool {
        self.active_target == Some(column)
    }
}
