//! Application layer: the evaluation session, offline mode and shutdown.

pub mod local;
pub mod progress;
pub mod session;
pub mod shutdown;

pub use local::{evaluate_fixed_step, run_local, LocalReport};
pub use progress::{ProgressEntry, ProgressHistory};
pub use session::{Session, SessionSummary, SnapshotReceiver};
pub use shutdown::ShutdownManager;
