use chrono::Local;

use crate::history::{History, HistoryEntry};
use crate::planner::Planner;
use crate::types::{BoardSize, Calculation, RecordedRequest};
use crate::validate::{BoardInput, RequestInput, ValidationError, validate};

/// State of one running calculator.
///
/// Only two actions change it: [`Session::submit`] and
/// [`Session::select_history`].
#[derive(Debug, Default)]
pub struct Session {
    board: BoardSize,
    requests: Vec<RecordedRequest>,
    current: Option<Calculation>,
    history: History,
}

impl Session {
    pub fn new(history: History) -> Self {
        Self {
            history,
            ..Default::default()
        }
    }

    pub fn board(&self) -> BoardSize {
        self.board
    }

    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }

    pub fn current(&self) -> Option<&Calculation> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Validate, plan and remember a calculation. On a validation error
    /// nothing in the session changes.
    pub fn submit(
        &mut self,
        board: BoardInput,
        rows: &[RequestInput],
    ) -> Result<&Calculation, ValidationError> {
        let (size, requests) = validate(board, rows)?;
        let plan = Planner::new(size.width, requests.clone()).plan();
        let calculation = Calculation::new(size, &requests, plan);

        tracing::info!(
            board = %size,
            boards = calculation.board_count(),
            pieces = calculation.piece_count(),
            "calculation complete"
        );

        self.history
            .record(HistoryEntry::new(Local::now(), calculation.clone()));
        self.board = size;
        self.requests = calculation.requests.clone();
        Ok(&*self.current.insert(calculation))
    }

    /// Show a stored calculation exactly as it was saved, restoring its board
    /// size and requests. Returns `None` for an unknown index.
    pub fn select_history(&mut self, index: usize) -> Option<&Calculation> {
        let calculation = self.history.get(index)?.calculation.clone();
        tracing::debug!(index, "replaying history entry");
        self.board = calculation.board_size();
        self.requests = calculation.requests.clone();
        Some(&*self.current.insert(calculation))
    }
}
