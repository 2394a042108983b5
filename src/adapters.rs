//! Thin adapters showing how to plug a concrete graph representation into
//! [`crate::oracle::GraphOracle`].
pub mod grid;
pub mod graph;
