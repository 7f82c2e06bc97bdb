//! Reload and mutation flows against a [`StudentStore`].
//!
//! These run in spawned tasks. Results are sent back as [`RosterEvent`]s so
//! the roster reducer stays the only place state changes. Every successful
//! mutation is followed by exactly one reload; a failed one by none.

use std::collections::HashSet;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::ApiError;
use crate::models::{sort_by_id, StudentRecord};
use crate::roster::RosterEvent;
use crate::store::StudentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    /// Generic message shown to the user when the store rejects the request.
    pub fn failure_message(&self) -> &'static str {
        match self {
            MutationKind::Create => "Error adding student",
            MutationKind::Update => "Error updating student",
            MutationKind::Delete => "Error deleting student",
        }
    }
}

/// A single store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create(StudentRecord),
    Update(StudentRecord),
    Delete(i64),
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Create(_) => MutationKind::Create,
            Mutation::Update(_) => MutationKind::Update,
            Mutation::Delete(_) => MutationKind::Delete,
        }
    }

    /// Id of the existing record this write touches.
    pub fn target(&self) -> Option<i64> {
        match self {
            Mutation::Create(_) => None,
            Mutation::Update(record) => record.id,
            Mutation::Delete(id) => Some(*id),
        }
    }
}

/// Helper to send roster events, logging any channel errors
async fn send_event(tx: &mpsc::Sender<RosterEvent>, event: RosterEvent) {
    if let Err(e) = tx.send(event).await {
        error!(error = %e, "Failed to send roster event - channel closed");
    }
}

/// Replace the cache with the store's current collection, sorted by id.
///
/// On failure the cache is left as it was and only the loading flag clears.
pub async fn reload<S>(store: &S, tx: &mpsc::Sender<RosterEvent>)
where
    S: StudentStore + ?Sized,
{
    send_event(tx, RosterEvent::LoadStarted).await;

    match store.list().await {
        Ok(mut students) => {
            sort_by_id(&mut students);
            warn_on_duplicate_ids(&students);
            info!(count = students.len(), "Roster reloaded");
            send_event(tx, RosterEvent::LoadSucceeded(students)).await;
        }
        Err(e) => {
            error!(error = %e, "Failed to load students, keeping cached roster");
            send_event(tx, RosterEvent::LoadFailed(format!("{:#}", e))).await;
        }
    }
}

/// Send `mutation` to the store, then reload on success.
///
/// The reload completes before `MutationSucceeded` is sent, so the dialog
/// closes over fresh data.
pub async fn apply<S>(store: &S, mutation: Mutation, tx: &mpsc::Sender<RosterEvent>)
where
    S: StudentStore + ?Sized,
{
    let kind = mutation.kind();
    let target = mutation.target();
    let result = match &mutation {
        Mutation::Create(candidate) => store.create(candidate).await,
        Mutation::Update(record) => store.update(record).await,
        Mutation::Delete(id) => match store.delete(*id).await {
            // Already gone on the server; the reload will drop it locally.
            Err(e) if ApiError::is_not_found(&e) => {
                debug!(id, "Delete target not found, treating as deleted");
                Ok(())
            }
            other => other,
        },
    };

    match result {
        Ok(()) => {
            reload(store, tx).await;
            send_event(tx, RosterEvent::MutationSucceeded { kind, target }).await;
        }
        Err(e) => {
            error!(?kind, error = %e, "Store rejected mutation");
            send_event(
                tx,
                RosterEvent::MutationFailed {
                    kind,
                    target,
                    reason: format!("{:#}", e),
                },
            )
            .await;
        }
    }
}

fn warn_on_duplicate_ids(students: &[StudentRecord]) {
    let mut seen = HashSet::new();
    for id in students.iter().filter_map(|s| s.id) {
        if !seen.insert(id) {
            warn!(id, "Store returned duplicate student id");
        }
    }
}
