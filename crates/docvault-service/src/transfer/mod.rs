//! Copy, move and bulk transfers between folders.

pub mod bulk;
pub mod orchestrator;
pub(crate) mod placement;
pub mod state;

pub use bulk::{BulkController, BulkError, BulkItemOutcome, BulkOperation, BulkReport, BulkRequest, ItemResult};
pub use orchestrator::TransferOrchestrator;
pub use state::{Transfer, TransferKind, TransferState};
