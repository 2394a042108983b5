//! Incremental goal-rooted shortest-path replanning.
//!
//! Given a directed, weighted graph whose edge costs may change over time
//! and whose current position may shift, [`engine::Engine`] produces an
//! optimal path to a fixed goal and reuses work across successive queries,
//! in the style of D* Lite. The graph itself, heuristics, and I/O are the
//! caller's concern, reached through [`oracle::GraphOracle`]; this crate
//! owns only the incremental search and its supporting indexed priority
//! queue.
//!
//! Two thin adapters under [`adapters`] fix the common cases (a dense 2-D
//! cost grid, and a generic adjacency-list graph) but are not required:
//! any type implementing `GraphOracle` works.

pub mod adapters;
pub mod collections;
pub mod cost;
pub mod engine;
pub mod error;
pub mod oracle;

pub use cost::Cost;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use oracle::GraphOracle;
