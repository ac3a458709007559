//! Scoped ownership of the roster file.
//!
//! A session loads the data file when it opens and writes the whole roster back
//! when it closes. Dropping an unclosed session saves too, so unwinding out of
//! the GUI still persists what was entered.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{Result, RosterError};
use crate::storage;
use crate::store::RecordStore;

#[derive(Debug)]
pub struct RosterSession {
    path: PathBuf,
    store: RecordStore,
    load_error: Option<RosterError>,
    closed: bool,
}

impl RosterSession {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let report = storage::load(&path);
        if let Some(e) = &report.stopped {
            warn!(path = %path.display(), error = %e, "session opened with a partial roster");
        }
        info!(path = %path.display(), students = report.store.len(), "session opened");
        RosterSession {
            path,
            store: report.store,
            load_error: report.stopped,
            closed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    /// Why the initial load stopped early, if it did.
    pub fn load_error(&self) -> Option<&RosterError> {
        self.load_error.as_ref()
    }

    /// Write the current roster without ending the session.
    pub fn save(&self) -> Result<()> {
        storage::save(&self.path, &self.store)
    }

    /// Write the roster and end the session, reporting whether the write succeeded.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        let result = self.save();
        match &result {
            Ok(()) => info!(path = %self.path.display(), "session closed"),
            Err(e) => error!(path = %self.path.display(), error = %e, "roster not saved on close"),
        }
        result
    }
}

impl Drop for RosterSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.save() {
            error!(path = %self.path.display(), error = %e, "roster not saved on drop");
        }
    }
}
