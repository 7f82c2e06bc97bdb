use tracing::debug;

use crate::mvi::Reducer;

use super::dialog::{DeleteConfirm, Dialog};
use super::event::RosterEvent;
use super::form::{FormPhase, RecordForm};
use super::state::RosterState;

pub struct RosterReducer;

impl Reducer for RosterReducer {
    type State = RosterState;
    type Intent = RosterEvent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            RosterEvent::LoadStarted => {
                state.loading = true;
            }
            RosterEvent::LoadSucceeded(students) => {
                state.students = students;
                state.loading = false;
                state.clamp_cursor();
            }
            RosterEvent::LoadFailed(reason) => {
                // Stale-on-error: keep whatever was cached
                debug!(%reason, kept = state.students.len(), "Keeping stale roster");
                state.loading = false;
            }
            RosterEvent::SearchChanged(query) => {
                state.search_query = query;
                state.cursor = 0;
            }
            RosterEvent::CursorMoved(delta) => {
                let len = state.visible().len();
                state.cursor = if len == 0 {
                    0
                } else {
                    let max = (len - 1) as isize;
                    (state.cursor as isize).saturating_add(delta).clamp(0, max) as usize
                };
            }
            RosterEvent::AddOpened => {
                if !state.dialog.is_open() {
                    state.dialog = Dialog::Form(RecordForm::new(None));
                    state.notice = None;
                }
            }
            RosterEvent::EditOpened => {
                if !state.dialog.is_open() {
                    if let Some(target) = state.highlighted().cloned() {
                        state.dialog = Dialog::Form(RecordForm::new(Some(&target)));
                        state.notice = None;
                    }
                }
            }
            RosterEvent::DeleteOpened => {
                if !state.dialog.is_open() {
                    if let Some(confirm) = state.highlighted().cloned().and_then(DeleteConfirm::new) {
                        state.dialog = Dialog::ConfirmDelete(confirm);
                        state.notice = None;
                    }
                }
            }
            RosterEvent::DialogClosed => {
                state.dialog = Dialog::Closed;
            }
            RosterEvent::FormEdited(input) => {
                if let Dialog::Form(form) = &mut state.dialog {
                    form.apply(input);
                }
            }
            RosterEvent::FormRejected(error) => {
                if let Dialog::Form(form) = &mut state.dialog {
                    form.error = Some(error);
                }
            }
            RosterEvent::Submitted => match &mut state.dialog {
                Dialog::Form(form) => {
                    form.phase = FormPhase::Submitted;
                    form.error = None;
                }
                Dialog::ConfirmDelete(confirm) => confirm.confirmed = true,
                Dialog::Closed => {}
            },
            RosterEvent::MutationSucceeded { kind, target } => {
                if state.dialog.awaits(kind, target) {
                    state.dialog = Dialog::Closed;
                }
                state.notice = None;
            }
            RosterEvent::MutationFailed { kind, target, reason } => {
                debug!(?kind, ?target, %reason, "Mutation failed, dialog stays open");
                state.notice = Some(kind.failure_message().to_string());
                if state.dialog.awaits(kind, target) {
                    match &mut state.dialog {
                        Dialog::Form(form) => form.phase = FormPhase::CollectingInput,
                        Dialog::ConfirmDelete(confirm) => confirm.confirmed = false,
                        Dialog::Closed => {}
                    }
                }
            }
            RosterEvent::NoticeDismissed => {
                state.notice = None;
            }
        }
        state
    }
}
