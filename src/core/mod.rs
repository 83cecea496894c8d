//! Core business logic: fund lookup, resolution, holdings processing

pub mod config;
pub mod directory;
pub mod error;
pub mod filing;
pub mod holdings;
pub mod log;
pub mod resolver;

// Re-export main types for cleaner imports
pub use error::TrackerError;
pub use filing::{FilerMatch, FilingProvider};
pub use holdings::{Portfolio, Position};
pub use resolver::{FilerResolver, ResolvedFiler};
