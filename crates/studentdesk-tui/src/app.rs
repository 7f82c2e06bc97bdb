//! Application state management for Studentdesk.
//!
//! `App` owns the roster snapshot and the channel that background store tasks
//! report back on. Every roster change goes through `dispatch`, which runs the
//! roster reducer; the UI only reads the current snapshot.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use studentdesk_core::mvi::Reducer;
use studentdesk_core::roster::{RosterEvent, RosterReducer, RosterState};
use studentdesk_core::sync;
use studentdesk_core::utils::DateStyle;
use studentdesk_core::{ApiClient, Config, StudentStore};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A mutation produces at most four events; 32 leaves room for overlap.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: isize = 10;

/// Application state machine states
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

pub struct App {
    pub state: AppState,
    pub roster: RosterState,
    pub date_style: DateStyle,
    /// Where the store lives, shown in the title bar.
    pub store_label: String,

    store: Arc<dyn StudentStore>,
    sync_tx: mpsc::Sender<RosterEvent>,
    sync_rx: mpsc::Receiver<RosterEvent>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.base_url()?;
        let api = ApiClient::with_timeout(base_url, config.request_timeout())?;
        info!(base_url = api.base_url(), "Using student store");
        let label = api.base_url().to_string();
        Ok(Self::with_store(Arc::new(api), config.date_style(), label))
    }

    pub fn with_store(
        store: Arc<dyn StudentStore>,
        date_style: DateStyle,
        store_label: String,
    ) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            state: AppState::Normal,
            roster: RosterState::new(),
            date_style,
            store_label,
            store,
            sync_tx: tx,
            sync_rx: rx,
        }
    }

    /// Apply one roster event through the reducer.
    pub fn dispatch(&mut self, event: RosterEvent) {
        let current = std::mem::take(&mut self.roster);
        self.roster = RosterReducer::reduce(current, event);
    }

    /// True while the open dialog's mutation is in flight.
    pub fn submission_pending(&self) -> bool {
        self.roster.dialog.is_pending()
    }

    /// Start a reload in the background; results arrive via `check_background_tasks`.
    pub fn reload_background(&self) {
        let store = Arc::clone(&self.store);
        let tx = self.sync_tx.clone();
        tokio::spawn(async move {
            sync::reload(store.as_ref(), &tx).await;
        });
    }

    /// Confirm the open dialog.
    ///
    /// Invalid form input is reported on the form and never reaches the store.
    pub fn submit_dialog(&mut self) {
        if self.submission_pending() {
            debug!("Submission already in flight, ignoring");
            return;
        }
        match self.roster.dialog.submission() {
            Some(Ok(mutation)) => {
                self.dispatch(RosterEvent::Submitted);
                let store = Arc::clone(&self.store);
                let tx = self.sync_tx.clone();
                tokio::spawn(async move {
                    sync::apply(store.as_ref(), mutation, &tx).await;
                });
            }
            Some(Err(error)) => self.dispatch(RosterEvent::FormRejected(error)),
            None => {}
        }
    }

    /// Close the open dialog without touching the store.
    pub fn cancel_dialog(&mut self) {
        if self.roster.dialog.is_open() {
            self.dispatch(RosterEvent::DialogClosed);
        }
    }

    /// Fold every event background tasks have reported so far.
    pub fn check_background_tasks(&mut self) {
        while let Ok(event) = self.sync_rx.try_recv() {
            self.dispatch(event);
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use studentdesk_core::roster::{Dialog, FormError, FormInput};
    use studentdesk_core::StudentRecord;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<StudentRecord>>,
        writes: AtomicUsize,
        reject_writes: bool,
    }

    #[async_trait]
    impl StudentStore for MemoryStore {
        async fn list(&self) -> Result<Vec<StudentRecord>> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create(&self, candidate: &StudentRecord) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.reject_writes {
                return Err(anyhow!("rejected"));
            }
            let mut records = self.records.lock().unwrap();
            let id = records.len() as i64 + 1;
            records.push(candidate.clone().with_id(id));
            Ok(())
        }

        async fn update(&self, _record: &StudentRecord) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("not used"))
        }

        async fn delete(&self, id: i64) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.records.lock().unwrap().retain(|r| r.id != Some(id));
            Ok(())
        }
    }

    fn app_with(store: Arc<MemoryStore>) -> App {
        App::with_store(store, DateStyle::default(), "memory".to_string())
    }

    /// Let spawned store tasks run, then fold their events.
    async fn settle(app: &mut App) {
        for _ in 0..50 {
            tokio::task::yield_now().await;
            app.check_background_tasks();
        }
    }

    #[tokio::test]
    async fn test_startup_reload_fills_table() {
        let store = Arc::new(MemoryStore::default());
        store
            .records
            .lock()
            .unwrap()
            .push(StudentRecord::new("Nguyen Van An", None, "A").with_id(1));

        let mut app = app_with(store);
        assert!(app.roster.loading);
        app.reload_background();
        settle(&mut app).await;

        assert!(!app.roster.loading);
        assert_eq!(app.roster.students.len(), 1);
    }

    #[tokio::test]
    async fn test_add_through_dialog() {
        let store = Arc::new(MemoryStore::default());
        let mut app = app_with(Arc::clone(&store));
        app.reload_background();
        settle(&mut app).await;

        app.dispatch(RosterEvent::AddOpened);
        for c in "An Nguyen".chars() {
            app.dispatch(RosterEvent::FormEdited(FormInput::Char(c)));
        }
        app.submit_dialog();
        assert!(app.submission_pending());
        // A second confirm while in flight is ignored
        app.submit_dialog();
        settle(&mut app).await;

        assert!(!app.roster.dialog.is_open());
        assert_eq!(app.roster.students.len(), 1);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_submitted() {
        let store = Arc::new(MemoryStore::default());
        let mut app = app_with(Arc::clone(&store));

        app.dispatch(RosterEvent::AddOpened);
        app.submit_dialog();
        settle(&mut app).await;

        match &app.roster.dialog {
            Dialog::Form(form) => assert_eq!(form.error, Some(FormError::MissingName)),
            other => panic!("unexpected dialog: {other:?}"),
        }
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_write_shows_notice() {
        let store = Arc::new(MemoryStore {
            reject_writes: true,
            ..Default::default()
        });
        let mut app = app_with(store);

        app.dispatch(RosterEvent::AddOpened);
        app.dispatch(RosterEvent::FormEdited(FormInput::Char('X')));
        app.submit_dialog();
        settle(&mut app).await;

        assert!(app.roster.dialog.is_open());
        assert!(!app.submission_pending());
        assert_eq!(app.roster.notice.as_deref(), Some("Error adding student"));
    }

    #[tokio::test]
    async fn test_cancel_never_writes() {
        let store = Arc::new(MemoryStore::default());
        store
            .records
            .lock()
            .unwrap()
            .push(StudentRecord::new("A", None, "").with_id(1));
        let mut app = app_with(Arc::clone(&store));
        app.reload_background();
        settle(&mut app).await;

        app.dispatch(RosterEvent::DeleteOpened);
        app.cancel_dialog();
        settle(&mut app).await;

        assert!(!app.roster.dialog.is_open());
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert_eq!(app.roster.students.len(), 1);
    }
}
