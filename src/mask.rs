//! The [`PatternMask`] facade: one pattern, parsed once, with cached analysis
//! and step list shared by every call.

use std::collections::HashMap;

use log::{debug, trace, warn};
use once_cell::sync::OnceCell;

use crate::config::MaskConfig;
use crate::pattern::analyzer::{self, AnalysisResult, LiteralEntry, MaxLength};
use crate::pattern::ast::Pattern;
use crate::pattern::formatter::{self, FormattingStep, TransformationResult};
use crate::pattern::parser::{PatternError, parse_with_limit};

/// Analysis and input masking for a single pattern.
///
/// All derived state is computed on first use and never invalidated, so a
/// `PatternMask` can be shared between threads and queried concurrently.
#[derive(Debug)]
pub struct PatternMask {
    source: String,
    config: MaskConfig,
    parsed: OnceCell<Result<Pattern, PatternError>>,
    analysis: OnceCell<AnalysisResult>,
    prefix: OnceCell<String>,
    steps: OnceCell<Vec<FormattingStep>>,
    matcher: OnceCell<Option<fancy_regex::Regex>>,
}

impl PatternMask {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self::with_config(pattern, MaskConfig::default())
    }

    pub fn with_config(pattern: impl Into<String>, config: MaskConfig) -> Self {
        Self {
            source: pattern.into(),
            config,
            parsed: OnceCell::new(),
            analysis: OnceCell::new(),
            prefix: OnceCell::new(),
            steps: OnceCell::new(),
            matcher: OnceCell::new(),
        }
    }

    /// The pattern string as supplied.
    pub fn pattern(&self) -> &str {
        &self.source
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// The parsed pattern, or the reason it could not be parsed.
    pub fn parsed(&self) -> Result<&Pattern, &PatternError> {
        self.parsed
            .get_or_init(|| {
                let parsed = parse_with_limit(&self.source, self.config.max_nesting_depth);
                match &parsed {
                    Ok(pattern) => debug!(
                        "parsed pattern {:?} into {} top-level items",
                        self.source,
                        pattern.items.len()
                    ),
                    Err(err) => warn!("pattern {:?} degraded to defaults: {err}", self.source),
                }
                parsed
            })
            .as_ref()
    }

    /// The full analysis; conservative defaults when the pattern is unparseable.
    pub fn analysis(&self) -> &AnalysisResult {
        self.analysis.get_or_init(|| {
            let analysis = match self.parsed() {
                Ok(pattern) => analyzer::analyze(pattern),
                Err(_) => AnalysisResult::unknown(),
            };
            debug!(
                "analyzed {:?}: max length {}, {} literals",
                self.source,
                analysis.max_length,
                analysis.literals.len()
            );
            analysis
        })
    }

    pub fn max_length(&self) -> MaxLength {
        self.analysis().max_length
    }

    pub fn min_length(&self) -> usize {
        self.analysis().min_length
    }

    pub fn has_infinite_length(&self) -> bool {
        self.analysis().has_infinite_length
    }

    /// Guaranteed literals in pattern order, at their offsets in the longest match.
    pub fn literals(&self) -> &[LiteralEntry] {
        &self.analysis().literals
    }

    pub fn literal_occurrences(&self) -> &HashMap<String, Vec<usize>> {
        &self.analysis().literal_occurrences
    }

    /// Offsets at which `literal` occurs; empty when it never does.
    pub fn occurrences_of(&self, literal: &str) -> &[usize] {
        self.literal_occurrences()
            .get(literal)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Longest literal text every match begins with.
    pub fn prefix(&self) -> &str {
        self.prefix.get_or_init(|| match self.parsed() {
            Ok(pattern) => analyzer::extract_prefix(pattern),
            Err(_) => String::new(),
        })
    }

    /// Whether `input` matches the whole pattern, per the regex engine.
    ///
    /// Patterns the engine cannot compile match nothing.
    pub fn is_valid(&self, input: &str) -> bool {
        let matcher = self.matcher.get_or_init(|| {
            let anchored = format!("^(?:{})$", self.source);
            match fancy_regex::Regex::new(&anchored) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    warn!("pattern {:?} cannot be compiled for matching: {err}", self.source);
                    None
                }
            }
        });
        let Some(regex) = matcher else {
            return false;
        };
        regex.is_match(input).unwrap_or_else(|err| {
            debug!("matching {input:?} against {:?} failed: {err}", self.source);
            false
        })
    }

    /// The compiled step list; empty when the pattern is unparseable.
    pub fn steps(&self) -> &[FormattingStep] {
        self.steps.get_or_init(|| match self.parsed() {
            Ok(pattern) => {
                let steps = formatter::compile(pattern, self.config.unbounded_consume_limit);
                debug!("compiled {:?} into {} steps", self.source, steps.len());
                steps
            }
            Err(_) => Vec::new(),
        })
    }

    /// Reshape raw keystrokes into the layout the pattern implies.
    ///
    /// An unparseable pattern passes the filtered input through unchanged.
    pub fn format(&self, raw: &str) -> TransformationResult {
        let result = if self.parsed().is_ok() {
            formatter::apply(self.steps(), raw, self.max_length(), &self.config)
        } else {
            let formatted_text = self.config.filter(raw);
            TransformationResult {
                cursor_position: formatted_text.chars().count(),
                formatted_text,
            }
        };
        trace!("formatted {raw:?} as {:?}", result.formatted_text);
        result
    }

    /// A placeholder template of the expected input, e.g. `###-###-####`.
    pub fn expected_format(&self) -> String {
        formatter::render_template(self.steps(), self.config.placeholder)
    }
}
