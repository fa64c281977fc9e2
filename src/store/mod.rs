//! Booking persistence
//!
//! Bookings are appended to a `SQLite` table and mirrored into a
//! spreadsheet that is rewritten in full after every append. The table is
//! the durable record; a failed mirror write is logged and retried on the
//! next append.

pub mod spreadsheet;

use std::path::{Path, PathBuf};

use crate::Result;
use crate::db::{self, BookingRepo, DbPool};
use crate::flow::BookingDraft;

/// Durable append-only store for confirmed bookings
pub trait BookingStore: Send + Sync {
    /// Append one booking
    ///
    /// # Errors
    ///
    /// Returns error if the booking could not be persisted
    fn append(&self, draft: &BookingDraft) -> Result<()>;
}

/// Database-backed booking store with an optional spreadsheet mirror
#[derive(Clone)]
pub struct BookingLedger {
    repo: BookingRepo,
    spreadsheet: Option<PathBuf>,
}

impl BookingLedger {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self {
            repo: BookingRepo::new(pool),
            spreadsheet: None,
        }
    }

    /// Open the database at `db_path` and mirror into `spreadsheet`
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or migrated
    pub fn open(db_path: &Path, spreadsheet: impl Into<PathBuf>) -> Result<Self> {
        let pool = db::init(db_path)?;
        Ok(Self::new(pool).with_spreadsheet(spreadsheet))
    }

    /// Mirror every append into the spreadsheet at `path`
    #[must_use]
    pub fn with_spreadsheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.spreadsheet = Some(path.into());
        self
    }

    /// All stored bookings, oldest first
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be read
    pub fn bookings(&self) -> Result<Vec<BookingDraft>> {
        self.repo.list_all()
    }

    #[must_use]
    pub const fn repo(&self) -> &BookingRepo {
        &self.repo
    }
}

impl BookingStore for BookingLedger {
    fn append(&self, draft: &BookingDraft) -> Result<()> {
        self.repo.insert(draft)?;

        if let Some(path) = &self.spreadsheet {
            let mirrored = self
                .repo
                .list_all()
                .and_then(|bookings| spreadsheet::write_bookings(path, &bookings));
            if let Err(e) = mirrored {
                tracing::warn!(error = %e, path = %path.display(), "failed to mirror bookings spreadsheet");
            }
        }

        tracing::debug!(booking_id = %draft.id, "booking appended to ledger");
        Ok(())
    }
}
