pub mod profile_cache;
pub mod types;

// Re-export cache types
pub use types::*;
// Re-export the profile cache
pub use profile_cache::*;
