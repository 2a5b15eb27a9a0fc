//! Text rendering infrastructure
//!
//! - `cancellation`: cooperative cancellation shared with the task owner
//! - `local_data`: per-method rendering context (local names, class scope)
//! - `graph_text_writer`: the appendable sink every node renders into

pub mod cancellation;
pub mod graph_text_writer;
pub mod local_data;

pub use cancellation::{CancellationToken, Cancelled};
pub use graph_text_writer::GraphTextWriter;
pub use local_data::LocalData;
