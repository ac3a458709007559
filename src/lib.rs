//! Student roster: an id-keyed record store with grades, persisted to a flat text file.

pub mod error;
pub mod file_ops;
pub mod models;
pub mod session;
pub mod storage;
pub mod store;
pub mod utils;

pub use error::RosterError;
pub use models::{Average, Student, StudentId};
pub use session::RosterSession;
pub use store::RecordStore;
