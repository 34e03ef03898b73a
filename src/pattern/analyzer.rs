//! Static analysis of a parsed [`Pattern`]: match length bounds, the literal
//! inventory, and the guaranteed literal prefix.
//!
//! Literal positions are character offsets into the longest possible match.
//! Each component before a literal advances the offset by its maximum length,
//! or by its minimum length when it is unbounded.

use std::collections::HashMap;

use itertools::Itertools;

use super::ast::*;
use super::quantifier::{Bound, Quantifier, is_basic};

/// Upper bound on the length of any string a pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxLength {
    Finite(usize),
    Infinite,
}

impl MaxLength {
    pub fn is_infinite(self) -> bool {
        self == Self::Infinite
    }

    pub fn finite(self) -> Option<usize> {
        match self {
            Self::Finite(n) => Some(n),
            Self::Infinite => None,
        }
    }

    /// Overflow is reported as `Infinite`.
    fn plus(self, other: Self) -> Self {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => {
                a.checked_add(b).map_or(Self::Infinite, Self::Finite)
            }
            _ => Self::Infinite,
        }
    }

    fn longest(self, other: Self) -> Self {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.max(b)),
            _ => Self::Infinite,
        }
    }

    /// Length of `quantifier` repetitions of something at most `self` long.
    fn repeated(self, quantifier: Option<&Quantifier>) -> Self {
        let Some(quantifier) = quantifier else {
            return self;
        };
        match (self, quantifier.max) {
            (Self::Finite(0), _) | (_, Bound::Finite(0)) => Self::Finite(0),
            (Self::Infinite, _) | (_, Bound::Unbounded) => Self::Infinite,
            (Self::Finite(n), Bound::Finite(m)) => {
                n.checked_mul(m).map_or(Self::Infinite, Self::Finite)
            }
        }
    }
}

impl std::fmt::Display for MaxLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Infinite => write!(f, "unbounded"),
        }
    }
}

/// A literal the pattern guarantees to emit, at its offset in the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralEntry {
    pub text: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub max_length: MaxLength,
    pub min_length: usize,
    /// False whenever a length-hint lookahead bounds the pattern.
    pub has_infinite_length: bool,
    pub literals: Vec<LiteralEntry>,
    pub literal_occurrences: HashMap<String, Vec<usize>>,
}

impl AnalysisResult {
    /// The conservative result for patterns that cannot be analyzed.
    pub fn unknown() -> Self {
        Self {
            max_length: MaxLength::Infinite,
            min_length: 0,
            has_infinite_length: true,
            literals: Vec::new(),
            literal_occurrences: HashMap::new(),
        }
    }
}

/// Analyze a parsed pattern.
pub fn analyze(pattern: &Pattern) -> AnalysisResult {
    let mut max_length = sequence_max(&pattern.items);
    let mut min_length = sequence_min(&pattern.items);
    if let Some(hint) = length_hint(pattern) {
        if let Some(max) = hint.max_length {
            max_length = MaxLength::Finite(max);
        }
        if let Some(min) = hint.min_length {
            min_length = min;
        }
    }

    let mut literals = Vec::new();
    collect_literals(&pattern.items, &mut 0, &mut literals);
    let literal_occurrences = literals
        .iter()
        .map(|entry| (entry.text.clone(), entry.position))
        .into_group_map();

    AnalysisResult {
        max_length,
        min_length,
        has_infinite_length: max_length.is_infinite(),
        literals,
        literal_occurrences,
    }
}

/// The global length-hint lookahead, if the pattern declares one.
///
/// Hints are looked for in the top-level sequence and at the top level of
/// each top-level alternation branch.
pub fn length_hint(pattern: &Pattern) -> Option<&Lookahead> {
    fn hint_in(items: &[Item]) -> Option<&Lookahead> {
        items.iter().find_map(|item| match &item.component {
            Component::Lookahead(la) if la.is_length_hint() => Some(la),
            _ => None,
        })
    }

    hint_in(&pattern.items).or_else(|| {
        pattern.items.iter().find_map(|item| match &item.component {
            Component::Alternation(branches) => branches.iter().find_map(|b| hint_in(b)),
            _ => None,
        })
    })
}

/// Maximum match length of a component sequence.
pub fn sequence_max(items: &[Item]) -> MaxLength {
    items
        .iter()
        .map(item_max)
        .fold(MaxLength::Finite(0), MaxLength::plus)
}

/// Maximum match length of one item, quantifier included.
pub fn item_max(item: &Item) -> MaxLength {
    let base = match &item.component {
        Component::Literal { value, .. } => MaxLength::Finite(value.chars().count()),
        Component::CharacterClass(_) => MaxLength::Finite(1),
        Component::Group(inner) => sequence_max(inner),
        Component::Alternation(branches) => branches
            .iter()
            .map(|b| sequence_max(b))
            .fold(MaxLength::Finite(0), MaxLength::longest),
        Component::Anchor(_) | Component::Lookahead(_) => return MaxLength::Finite(0),
    };
    base.repeated(item.quantifier.as_ref())
}

fn sequence_min(items: &[Item]) -> usize {
    items
        .iter()
        .map(item_min)
        .fold(0, usize::saturating_add)
}

fn item_min(item: &Item) -> usize {
    let base = match &item.component {
        Component::Literal { value, .. } => value.chars().count(),
        Component::CharacterClass(_) => 1,
        Component::Group(inner) => sequence_min(inner),
        Component::Alternation(branches) => {
            branches.iter().map(|b| sequence_min(b)).min().unwrap_or(0)
        }
        Component::Anchor(_) | Component::Lookahead(_) => return 0,
    };
    let times = item.quantifier.map_or(1, |q| q.min);
    base.saturating_mul(times)
}

/// Record literals in source order. `offset` is the position in the longest match.
fn collect_literals(items: &[Item], offset: &mut usize, out: &mut Vec<LiteralEntry>) {
    for item in items {
        let quantifier = item.quantifier.as_ref();
        match &item.component {
            Component::Literal { value, .. } => {
                let text = if is_basic(quantifier) {
                    Some(value.clone())
                } else {
                    quantifier.and_then(Quantifier::exact).map(|n| value.repeat(n))
                };
                if let Some(text) = text.filter(|t| !t.is_empty()) {
                    out.push(LiteralEntry {
                        text,
                        position: *offset,
                    });
                }
            }
            Component::Group(inner) if is_basic(quantifier) => {
                collect_literals(inner, offset, out);
                continue;
            }
            _ => {}
        }
        let advance = item_max(item).finite().unwrap_or_else(|| item_min(item));
        *offset = offset.saturating_add(advance);
    }
}

/// Longest literal text every match of the pattern begins with.
pub fn extract_prefix(pattern: &Pattern) -> String {
    sequence_prefix(&pattern.items).0
}

/// Returns the prefix and whether the whole sequence was literal.
fn sequence_prefix(items: &[Item]) -> (String, bool) {
    let mut prefix = String::new();
    for item in items {
        let basic = is_basic(item.quantifier.as_ref());
        match &item.component {
            Component::Anchor(_) | Component::Lookahead(_) => {}
            Component::Literal { value, .. } if basic => prefix.push_str(value),
            Component::Group(inner) if basic => {
                let (inner_prefix, complete) = sequence_prefix(inner);
                prefix.push_str(&inner_prefix);
                if !complete {
                    return (prefix, false);
                }
            }
            Component::Alternation(branches) => {
                let prefixes: Vec<(String, bool)> =
                    branches.iter().map(|b| sequence_prefix(b)).collect();
                let common = common_prefix(prefixes.iter().map(|(p, _)| p.as_str()));
                let uniform = prefixes.iter().all(|(p, complete)| *complete && *p == common);
                prefix.push_str(&common);
                if !uniform {
                    return (prefix, false);
                }
            }
            _ => return (prefix, false),
        }
    }
    (prefix, true)
}

fn common_prefix<'a>(mut strings: impl Iterator<Item = &'a str>) -> String {
    let Some(first) = strings.next() else {
        return String::new();
    };
    let mut len = first.len();
    for s in strings {
        len = first[..len]
            .char_indices()
            .zip(s.chars())
            .find(|((_, a), b)| a != b)
            .map_or(len.min(s.len()), |((i, _), _)| i);
    }
    first[..len].to_string()
}
