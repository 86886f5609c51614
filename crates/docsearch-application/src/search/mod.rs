//! Search coordination: epoch tracking and the two-mode search protocol.

mod coordinator;
mod epoch;

pub use coordinator::{FAILURE_PREFIX, SearchCoordinator, SearchOutcome, validate_query};
pub use epoch::{EpochTicket, EpochTracker};
