//! Send/receive correlation.
//!
//! A receive is paired with the oldest unconsumed send that has the same
//! route and the same message content. Messages carry no ids of their own in
//! the trace, so content plus per-route FIFO order is all there is to go on.

mod error;
mod tracker;

pub use error::CorrelationError;
pub use tracker::MessageCorrelator;
