// Export modules for use in tests
pub mod filename;
pub mod fingerprint;
pub mod interrupt;
pub mod pdf;
pub mod prompt;
pub mod renamer;
pub mod title;

// Re-export the workflow entry points
pub use renamer::{RenameConfig, Renamer, RunSummary};
