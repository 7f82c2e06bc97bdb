use crate::models::StudentRecord;
use crate::sync::{Mutation, MutationKind};

use super::form::{FormError, FormPhase, RecordForm};

/// The one dialog that may be open over the table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    Closed,
    /// Add (no id) or Edit (id) form.
    Form(RecordForm),
    ConfirmDelete(DeleteConfirm),
}

/// Confirm/cancel decision over one persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirm {
    target_id: i64,
    pub target: StudentRecord,
    pub confirmed: bool,
}

impl DeleteConfirm {
    /// Returns `None` for records the store has not assigned an id yet.
    pub fn new(target: StudentRecord) -> Option<Self> {
        let target_id = target.id?;
        Some(Self {
            target_id,
            target,
            confirmed: false,
        })
    }

    pub fn target_id(&self) -> i64 {
        self.target_id
    }
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::Closed)
    }

    /// The store operation this dialog leads to.
    pub fn kind(&self) -> Option<MutationKind> {
        match self {
            Dialog::Closed => None,
            Dialog::Form(form) => Some(form.kind()),
            Dialog::ConfirmDelete(_) => Some(MutationKind::Delete),
        }
    }

    /// Id of the record the dialog operates on, if any.
    pub fn target_id(&self) -> Option<i64> {
        match self {
            Dialog::Closed => None,
            Dialog::Form(form) => form.id(),
            Dialog::ConfirmDelete(confirm) => Some(confirm.target_id()),
        }
    }

    /// The dialog's mutation was handed to the store and has not come back.
    pub fn is_pending(&self) -> bool {
        match self {
            Dialog::Closed => false,
            Dialog::Form(form) => form.phase == FormPhase::Submitted,
            Dialog::ConfirmDelete(confirm) => confirm.confirmed,
        }
    }

    /// Whether an outcome for `kind` on `target` belongs to this dialog.
    /// A dialog reopened after cancel never matches an earlier submission.
    pub fn awaits(&self, kind: MutationKind, target: Option<i64>) -> bool {
        self.is_pending() && self.kind() == Some(kind) && self.target_id() == target
    }

    /// What confirming the dialog would send to the store.
    /// `None` when no dialog is open.
    pub fn submission(&self) -> Option<Result<Mutation, FormError>> {
        match self {
            Dialog::Closed => None,
            Dialog::Form(form) => Some(form.mutation()),
            Dialog::ConfirmDelete(confirm) => Some(Ok(Mutation::Delete(confirm.target_id()))),
        }
    }
}
