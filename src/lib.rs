//! Static analysis and input masking for a restricted regular-expression
//! dialect.
//!
//! # Example
//!
//! ```rust
//! use patmask::{MaxLength, PatternMask};
//!
//! let mask = PatternMask::new("[0-9]{3}-[0-9]{3}-[0-9]{4}");
//!
//! // Raw keystrokes are laid out around the pattern's literals
//! let result = mask.format("1234567890");
//! assert_eq!(result.formatted_text, "123-456-7890");
//! assert_eq!(result.cursor_position, 12);
//!
//! // Separators are only shown ahead of more input
//! assert_eq!(mask.format("1234").formatted_text, "123-4");
//!
//! assert_eq!(mask.max_length(), MaxLength::Finite(12));
//! assert_eq!(mask.occurrences_of("-"), &[3, 7]);
//! assert!(mask.is_valid("123-456-7890"));
//! ```

mod config;
mod mask;
pub mod pattern;

pub use config::{DEFAULT_UNBOUNDED_CONSUME_LIMIT, MaskConfig};
pub use mask::PatternMask;
pub use pattern::{
    AnalysisResult, FormattingStep, LiteralEntry, MaxLength, PatternError, TransformationResult,
};
