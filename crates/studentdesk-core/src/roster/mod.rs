//! The table view state and everything that changes it.

pub mod dialog;
pub mod event;
pub mod filter;
pub mod form;
pub mod reducer;
pub mod state;

pub use dialog::{DeleteConfirm, Dialog};
pub use event::RosterEvent;
pub use filter::filter_students;
pub use form::{FormError, FormField, FormInput, FormPhase, RecordForm};
pub use reducer::RosterReducer;
pub use state::{RosterState, RosterView};
