use crate::models::StudentRecord;
use crate::mvi::Intent;
use crate::sync::MutationKind;

use super::form::{FormError, FormInput};

/// Discrete events that move the roster from one snapshot to the next.
///
/// User intents come from the input layer; `Load*` and `Mutation*` come
/// back from spawned sync tasks over a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterEvent {
    LoadStarted,
    /// Already sorted by id.
    LoadSucceeded(Vec<StudentRecord>),
    LoadFailed(String),

    SearchChanged(String),
    /// Move the cursor by a delta, clamped to the filtered view.
    CursorMoved(isize),

    AddOpened,
    /// Edit the highlighted record.
    EditOpened,
    /// Confirm deletion of the highlighted record.
    DeleteOpened,
    /// Cancel, Esc or backdrop click. Never reaches the store.
    DialogClosed,

    FormEdited(FormInput),
    FormRejected(FormError),
    /// The open dialog's mutation was handed to the store.
    Submitted,

    /// `target` is the record id the mutation touched, `None` for a create.
    MutationSucceeded {
        kind: MutationKind,
        target: Option<i64>,
    },
    MutationFailed {
        kind: MutationKind,
        target: Option<i64>,
        reason: String,
    },

    NoticeDismissed,
}

impl Intent for RosterEvent {}
