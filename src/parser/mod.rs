pub mod context;
pub mod pattern;

// Re-export the public API so call sites can stay short.
pub use context::{parse_context_tokens, ContextToken};
pub use pattern::{ParsedPattern, PatternPart};
