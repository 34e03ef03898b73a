//! Mask pattern front end and analysis.
//!
//! Patterns are a restricted regular-expression dialect. The parser never
//! rejects malformed syntax; it reads the offending fragment as literal text.
//!
//! # Pattern syntax
//!
//! | Token               | Meaning                                         |
//! |---------------------|-------------------------------------------------|
//! | `x`                 | One literal character                           |
//! | `\x`                | Escaped literal (`\n`, `\t`, ... are controls)   |
//! | `\d` `\w` `\s`      | Shorthand class (and the negated `\D` `\W` `\S`) |
//! | `[...]`             | Character class                                 |
//! | `.`                 | Any character                                   |
//! | `(...)`             | Group (`(?:`, `(?<name>` and `(?P<name>` too)   |
//! | `X\|Y`              | Alternation                                     |
//! | `^` `$` `\b`        | Zero-width anchors                              |
//! | `(?=...)` `(?!...)` | Zero-width lookahead                            |
//! | `(?=^.{n,m}$)`      | Length hint: every match is `n..=m` long         |
//! | `*` `+` `?`         | Zero or more, one or more, optional             |
//! | `{n}`               | Exactly n                                       |
//! | `{n,}`              | At least n                                      |
//! | `{n,m}`             | Between n and m                                 |

pub mod analyzer;
pub mod ast;
pub mod formatter;
pub mod parser;
pub mod quantifier;

pub use analyzer::{AnalysisResult, LiteralEntry, MaxLength, analyze, extract_prefix};
pub use formatter::{FormattingStep, TransformationResult};
pub use parser::{PatternError, parse};
