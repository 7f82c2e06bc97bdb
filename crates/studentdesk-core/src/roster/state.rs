use crate::models::StudentRecord;
use crate::mvi::UiState;

use super::dialog::Dialog;
use super::filter::filter_students;

/// Everything the table view renders, as one snapshot.
///
/// `students` is the Student Data Cache: whatever the store returned on the
/// last successful reload, sorted by id. It is only replaced by the reducer
/// on a load-succeeded event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosterState {
    pub students: Vec<StudentRecord>,
    pub loading: bool,
    pub search_query: String,
    /// Highlighted row within the filtered view.
    pub cursor: usize,
    pub dialog: Dialog,
    /// Generic user-facing failure message.
    pub notice: Option<String>,
}

impl UiState for RosterState {}

/// The three mutually exclusive table states.
#[derive(Debug, PartialEq)]
pub enum RosterView<'a> {
    Loading,
    Empty,
    Populated(Vec<&'a StudentRecord>),
}

impl RosterState {
    /// Initial state on start: nothing cached and a reload pending.
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    /// The cache narrowed by the current search query.
    pub fn visible(&self) -> Vec<&StudentRecord> {
        filter_students(&self.students, &self.search_query)
    }

    pub fn view(&self) -> RosterView<'_> {
        if self.loading {
            return RosterView::Loading;
        }
        let visible = self.visible();
        if visible.is_empty() {
            RosterView::Empty
        } else {
            RosterView::Populated(visible)
        }
    }

    /// Record under the cursor in the filtered view.
    /// Nothing is highlighted while a load hides the table.
    pub fn highlighted(&self) -> Option<&StudentRecord> {
        if self.loading {
            return None;
        }
        self.visible().get(self.cursor).copied()
    }

    pub(crate) fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}
