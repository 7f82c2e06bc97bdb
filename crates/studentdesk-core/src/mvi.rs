//! Model-View-Intent primitives.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: a self-contained snapshot with everything the view renders
//! - **Intent**: a user action or a system event (store responses)
//! - **Reducer**: the only place state transitions happen

/// Marker trait for view state snapshots.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}

/// Marker trait for intents.
pub trait Intent: Send + 'static {}

/// Pure transition function: (State, Intent) -> State.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
