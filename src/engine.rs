pub mod key;
pub mod replanner;

pub use replanner::Engine;
