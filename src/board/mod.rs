//! The board controller: loads notes on startup, accepts submissions and
//! keeps the presenter in sync with the session's note list.
//!
//! Remote failures never reach the caller. A failed load falls back to the
//! device store and a failed create keeps the note on this device, so the
//! worst case for a visitor is a board that is local-only.

pub mod countdown;
pub mod presenter;
pub mod render;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::dto::{Status, SubmitNoteRequest};
use crate::models::Note;
use crate::storage::local::LocalBackend;
use crate::storage::{AnyBackend, MAX_SESSION_NOTES, NoteBackend};

use self::presenter::Presenter;
use self::render::render_board;

pub const LOADING_SHARED: &str = "Loading the shared board…";
pub const SHARED_READY: &str = "Live board is up to date.";
pub const SHARED_UNREACHABLE: &str = "Could not reach the backend. Using this device only.";
pub const LOCAL_ONLY: &str = "Using local-only board. Add a backend to share.";
pub const SAVING_SHARED: &str = "Saving to the shared board…";
pub const SAVED_SHARED: &str = "Saved for everyone.";
pub const SAVED_DEVICE_FALLBACK: &str = "Backend unreachable, saved to this device only.";
pub const SAVED_DEVICE: &str = "Saved on this device. Add a backend to share it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The note was stored somewhere; the form should be reset
    Saved(Note),
    /// Blank message, nothing was stored; the message input should get focus
    Declined,
}

#[derive(Debug)]
struct BoardSession {
    notes: Vec<Note>,
    loading: bool,
}

/// Counts one outstanding submission until dropped, including when the
/// submitting future is cancelled mid-save.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct BoardController {
    backend: AnyBackend,
    local: Arc<LocalBackend>,
    presenter: Arc<dyn Presenter>,
    session: Mutex<BoardSession>,
    in_flight: AtomicUsize,
}

impl BoardController {
    pub fn new(backend: AnyBackend, local: Arc<LocalBackend>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            backend,
            local,
            presenter,
            session: Mutex::new(BoardSession {
                notes: Vec::new(),
                loading: true,
            }),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub async fn phase(&self) -> Phase {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            return Phase::Submitting;
        }

        if self.session.lock().await.loading {
            Phase::Loading
        } else {
            Phase::Ready
        }
    }

    pub async fn notes(&self) -> Vec<Note> {
        self.session.lock().await.notes.clone()
    }

    #[tracing::instrument(skip(self), name = "BoardController::start")]
    pub async fn start(&self) {
        self.session.lock().await.loading = true;

        let shared = self.backend.is_shared();
        if shared {
            self.presenter.announce(&Status::live(LOADING_SHARED));
        }

        match self.backend.fetch_notes().await {
            Ok(notes) => {
                tracing::info!("Loaded {} notes", notes.len());
                self.replace_notes(notes).await;
                self.presenter.announce(&if shared {
                    Status::success(SHARED_READY)
                } else {
                    Status::live(LOCAL_ONLY)
                });
                return;
            }
            Err(e) => {
                tracing::warn!("Could not load backend, falling back locally: {e}");
                self.presenter.announce(&Status::error(SHARED_UNREACHABLE));
            }
        }

        let notes = self.local.load().await;
        self.replace_notes(notes).await;
        self.presenter.announce(&Status::live(LOCAL_ONLY));
    }

    /// Handles one form submission. Overlapping submissions are not
    /// serialized: each prepends its note whenever its write completes.
    #[tracing::instrument(skip(self, request), name = "BoardController::submit")]
    pub async fn submit(&self, request: &SubmitNoteRequest) -> SubmitOutcome {
        let Some(entry) = Note::from_submission(&request.name, &request.message, Utc::now()) else {
            tracing::debug!("Declined a note with an empty message");
            return SubmitOutcome::Declined;
        };

        let _submitting = InFlight::enter(&self.in_flight);

        let saved = if self.backend.is_shared() {
            self.save_shared(entry).await
        } else {
            self.save_on_device(entry).await
        };

        SubmitOutcome::Saved(saved)
    }

    async fn save_shared(&self, entry: Note) -> Note {
        self.presenter.announce(&Status::live(SAVING_SHARED));

        match self.backend.create_note(&entry).await {
            Ok(saved) => {
                self.prepend(saved.clone()).await;
                self.presenter.announce(&Status::success(SAVED_SHARED));
                saved
            }
            Err(e) => {
                // The remote may still have committed the row; no reconciliation is attempted.
                tracing::warn!("Backend unavailable, saving locally instead: {e}");
                let notes = self.prepend(entry.clone()).await;
                self.local.persist(&notes).await;
                self.presenter.announce(&Status::error(SAVED_DEVICE_FALLBACK));
                entry
            }
        }
    }

    async fn save_on_device(&self, entry: Note) -> Note {
        let saved = self.backend.create_note(&entry).await.unwrap_or_else(|e| {
            tracing::warn!("Could not save note on this device: {e}");
            entry
        });

        self.prepend(saved.clone()).await;
        self.presenter.announce(&Status::live(SAVED_DEVICE));
        saved
    }

    async fn replace_notes(&self, notes: Vec<Note>) {
        let mut session = self.session.lock().await;
        session.notes = notes;
        session.notes.truncate(MAX_SESSION_NOTES);
        session.loading = false;
        self.presenter.render(&render_board(&session.notes, Utc::now()));
    }

    async fn prepend(&self, note: Note) -> Vec<Note> {
        let mut session = self.session.lock().await;
        session.notes.insert(0, note);
        session.notes.truncate(MAX_SESSION_NOTES);
        self.presenter.render(&render_board(&session.notes, Utc::now()));
        session.notes.clone()
    }
}
