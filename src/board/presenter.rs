use std::sync::RwLock;

use crate::dto::{BoardSnapshot, RenderedBoard, Status};

/// Where the controller sends everything a visitor sees.
pub trait Presenter: Send + Sync {
    fn render(&self, board: &RenderedBoard);

    /// Replaces whatever status was shown before
    fn announce(&self, status: &Status);

    fn show_countdown(&self, text: &str);
}

/// Keeps the latest board state for the HTTP handlers to read.
#[derive(Debug)]
pub struct BoardView {
    snapshot: RwLock<BoardSnapshot>,
}

impl BoardView {
    pub fn new(holiday: String) -> Self {
        Self {
            snapshot: RwLock::new(BoardSnapshot {
                holiday,
                countdown: String::new(),
                status: None,
                board: crate::board::render::render_board(&[], chrono::Utc::now()),
            }),
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn update(&self, apply: impl FnOnce(&mut BoardSnapshot)) {
        let mut snapshot = self
            .snapshot
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        apply(&mut snapshot);
    }
}

impl Presenter for BoardView {
    fn render(&self, board: &RenderedBoard) {
        self.update(|snapshot| snapshot.board = board.clone());
    }

    fn announce(&self, status: &Status) {
        tracing::debug!(tone = ?status.tone, "{}", status.text);
        self.update(|snapshot| snapshot.status = Some(status.clone()));
    }

    fn show_countdown(&self, text: &str) {
        self.update(|snapshot| snapshot.countdown = text.to_string());
    }
}
