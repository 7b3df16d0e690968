//! Fan-out/join orchestration for reconciliation passes.
//!
//! One pass fetches all four raw streams concurrently, degrades each failed
//! fetch to an empty list, joins at a single barrier, then runs the pure
//! core pipeline and installs the result as the current snapshot. Passes
//! carry an epoch so a slow pass that finishes after a newer one is
//! discarded on arrival instead of clobbering fresher data.

mod coordinator;
mod snapshot;

pub mod error;

pub use coordinator::Coordinator;
pub use error::{Error, Result};
pub use snapshot::{Snapshot, SubjectReport};
