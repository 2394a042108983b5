use thiserror::Error;

/// Errors the engine surfaces to the caller immediately, leaving its
/// internal state unchanged.
///
/// `NoPath` is deliberately not a variant here: an unreachable goal is an
/// ordinary outcome of `plan()`, represented by an empty path, not a
/// failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("edge cost from {u:?} to {v:?} is negative: {cost}")]
    NegativeCost { u: String, v: String, cost: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
