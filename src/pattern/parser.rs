//! Tokenizer and recursive descent parser for mask patterns.
//!
//! Malformed syntax never fails the parse: unterminated classes degrade to
//! literal text, unterminated groups run to the end of the pattern, and
//! quantifier characters with nothing to quantify are read as literals. The
//! only error is exceeding the nesting limit.

use phf::{Map, Set, phf_map, phf_set};

use super::ast::*;
use super::quantifier::{Bound, parse_quantifier};

/// Nesting limit used by [`parse`].
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Escape letters that denote a character class rather than a literal.
const SHORTHAND_CLASSES: Set<char> = phf_set! {'d', 'D', 'w', 'W', 's', 'S'};

/// Escape letters that denote a control character.
const CONTROL_ESCAPES: Map<char, char> = phf_map! {
    'n' => '\n',
    't' => '\t',
    'r' => '\r',
    'f' => '\x0c',
    'v' => '\x0b',
    '0' => '\0',
};

#[derive(Debug, Clone, PartialEq)]
pub enum PatternError {
    NestingTooDeep { limit: usize },
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NestingTooDeep { limit } => {
                write!(f, "Pattern nests groups deeper than {limit} levels")
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Parse a pattern string into a [`Pattern`].
pub fn parse(input: &str) -> Result<Pattern, PatternError> {
    parse_with_limit(input, DEFAULT_MAX_NESTING_DEPTH)
}

/// Parse with an explicit group nesting limit.
pub fn parse_with_limit(input: &str, max_depth: usize) -> Result<Pattern, PatternError> {
    let chars: Vec<char> = input.chars().collect();
    let items = Parser { max_depth }.parse_sequence(&chars, 0)?;
    Ok(Pattern { items })
}

struct Parser {
    max_depth: usize,
}

impl Parser {
    /// Parse `chars` as one sequence, splitting on `|` at this level.
    fn parse_sequence(&self, chars: &[char], depth: usize) -> Result<Vec<Item>, PatternError> {
        if depth > self.max_depth {
            return Err(PatternError::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        let mut branches = vec![Vec::new()];
        let mut pos = 0;
        while pos < chars.len() {
            if chars[pos] == '|' {
                branches.push(Vec::new());
                pos += 1;
                continue;
            }

            // A quantifier with nothing to repeat reads as a plain literal.
            let stray = matches!(chars[pos], '*' | '+' | '?' | '{');
            let (component, used) = self.parse_component(chars, pos, depth)?;
            pos += used;

            let mut item = Item::new(component);
            if !stray
                && item.component.is_quantifiable()
                && let Some((quantifier, used)) = parse_quantifier(&chars[pos..])
            {
                item.quantifier = Some(quantifier);
                pos += used;
                // Lazy modifier; matching stays greedy.
                if chars.get(pos) == Some(&'?') {
                    pos += 1;
                }
            }

            if let Some(branch) = branches.last_mut() {
                branch.push(item);
            }
        }

        if branches.len() == 1 {
            Ok(branches.pop().unwrap_or_default())
        } else {
            Ok(vec![Item::new(Component::Alternation(branches))])
        }
    }

    /// Parse one component at `pos`. Returns it with the number of characters used.
    fn parse_component(
        &self,
        chars: &[char],
        pos: usize,
        depth: usize,
    ) -> Result<(Component, usize), PatternError> {
        let rest = &chars[pos..];
        let component = match rest[0] {
            '\\' => return Ok(parse_escape(rest)),
            '[' => {
                return Ok(match class_end(rest) {
                    Some(end) => (Component::CharacterClass(collect(&rest[..=end])), end + 1),
                    None => (Component::literal(collect(rest)), rest.len()),
                });
            }
            '(' => return self.parse_group(rest, depth),
            '.' => Component::CharacterClass(".".to_string()),
            '^' => Component::Anchor(AnchorKind::Start),
            '$' => Component::Anchor(AnchorKind::End),
            c => Component::literal(c),
        };
        Ok((component, 1))
    }

    /// Parse a group or lookahead; `rest` starts at the `(`.
    fn parse_group(&self, rest: &[char], depth: usize) -> Result<(Component, usize), PatternError> {
        let (content, used) = match group_end(rest) {
            Some(end) => (&rest[1..end], end + 1),
            None => (&rest[1..], rest.len()),
        };

        let lookaround = [
            ("?=", false),
            ("?!", true),
            ("?<=", false),
            ("?<!", true),
        ]
        .into_iter()
        .find(|(prefix, _)| starts_with(content, prefix));
        if let Some((prefix, negative)) = lookaround {
            let body = collect(&content[prefix.len()..]);
            let (min_length, max_length) = if prefix == "?=" {
                length_hint(&body).unwrap_or((None, None))
            } else {
                (None, None)
            };
            let lookahead = Lookahead {
                negative,
                content: body,
                min_length,
                max_length,
            };
            return Ok((Component::Lookahead(lookahead), used));
        }

        let inner = group_body(content);
        let items = self.parse_sequence(inner, depth + 1)?;
        Ok((Component::Group(items), used))
    }
}

/// Parse an escape; `rest` starts at the backslash.
fn parse_escape(rest: &[char]) -> (Component, usize) {
    let Some(&c) = rest.get(1) else {
        return (Component::literal('\\'), 1);
    };
    let component = if SHORTHAND_CLASSES.contains(&c) {
        Component::CharacterClass(format!("\\{c}"))
    } else if c == 'b' || c == 'B' {
        Component::Anchor(AnchorKind::WordBoundary)
    } else {
        Component::Literal {
            source: format!("\\{c}"),
            value: CONTROL_ESCAPES.get(&c).copied().unwrap_or(c).to_string(),
        }
    };
    (component, 2)
}

/// Strip a non-capturing or named-group prefix from group content.
fn group_body(content: &[char]) -> &[char] {
    if starts_with(content, "?:") {
        return &content[2..];
    }
    if (starts_with(content, "?<") || starts_with(content, "?P<"))
        && let Some(close) = content.iter().position(|&c| c == '>')
    {
        return &content[close + 1..];
    }
    content
}

/// Recognise the `^.{n}$`, `^.{n,m}$` and `^.{n,}$` length-hint shapes.
fn length_hint(body: &str) -> Option<(Option<usize>, Option<usize>)> {
    let bounds = body.strip_prefix("^.")?.strip_suffix('$')?;
    let chars: Vec<char> = bounds.chars().collect();
    if chars.first() != Some(&'{') {
        return None;
    }
    let (quantifier, used) = parse_quantifier(&chars)?;
    if used != chars.len() {
        return None;
    }
    let max = match quantifier.max {
        Bound::Finite(max) => Some(max),
        Bound::Unbounded => None,
    };
    Some((Some(quantifier.min), max))
}

/// Index of the `]` closing the class that starts at `rest[0]`.
///
/// A `]` directly after `[` or `[^` is a class member.
fn class_end(rest: &[char]) -> Option<usize> {
    let mut i = 1;
    if rest.get(i) == Some(&'^') {
        i += 1;
    }
    if rest.get(i) == Some(&']') {
        i += 1;
    }
    while i < rest.len() {
        match rest[i] {
            '\\' => i += 2,
            ']' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Index of the `)` matching the `(` at `rest[0]`.
fn group_end(rest: &[char]) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            '\\' => i += 1,
            '[' => {
                if let Some(end) = class_end(&rest[i..]) {
                    i += end;
                }
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn starts_with(chars: &[char], prefix: &str) -> bool {
    let mut it = chars.iter();
    prefix.chars().all(|p| it.next() == Some(&p))
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::quantifier::{Bound, Quantifier};

    fn items(s: &str) -> Vec<Item> {
        parse(s).expect("parse should succeed").items
    }

    fn lit(text: &str) -> Component {
        Component::literal(text)
    }

    // --- Literals and escapes ---

    #[test]
    fn one_literal_per_character() {
        let items = items("ab-");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].component, lit("a"));
        assert_eq!(items[2].component, lit("-"));
        assert!(items.iter().all(|i| i.quantifier.is_none()));
    }

    #[test]
    fn escaped_literal_keeps_source_and_value() {
        let items = items(r"\.");
        assert_eq!(
            items[0].component,
            Component::Literal {
                source: r"\.".to_string(),
                value: ".".to_string()
            }
        );
    }

    #[test]
    fn control_escape_value() {
        match &items(r"\t")[0].component {
            Component::Literal { value, .. } => assert_eq!(value, "\t"),
            other => panic!("expected Literal, got {other:?}"),
        }
    }

    #[test]
    fn shorthand_escape_is_class() {
        let items = items(r"\d{3}");
        assert_eq!(items[0].component, Component::CharacterClass(r"\d".to_string()));
        assert_eq!(items[0].quantifier, Some(Quantifier::exactly(3)));
    }

    #[test]
    fn trailing_backslash_is_literal() {
        let items = items(r"a\");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].component, lit("\\"));
    }

    #[test]
    fn word_boundary_is_anchor() {
        assert_eq!(
            items(r"\b")[0].component,
            Component::Anchor(AnchorKind::WordBoundary)
        );
    }

    // --- Classes ---

    #[test]
    fn class_with_quantifier() {
        let items = items("[0-9]{3}");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].component, Component::CharacterClass("[0-9]".to_string()));
        assert_eq!(items[0].quantifier, Some(Quantifier::exactly(3)));
    }

    #[test]
    fn class_with_leading_bracket_member() {
        let items = items("[]a]b");
        assert_eq!(items[0].component, Component::CharacterClass("[]a]".to_string()));
        assert_eq!(items[1].component, lit("b"));
    }

    #[test]
    fn unterminated_class_is_literal_text() {
        let items = items("a[0-9");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].component, lit("[0-9"));
    }

    #[test]
    fn dot_is_wildcard_class() {
        assert_eq!(items(".")[0].component, Component::CharacterClass(".".to_string()));
    }

    // --- Groups ---

    #[test]
    fn group_content_is_nested_sequence() {
        let items = items("(ID)x");
        assert_eq!(items.len(), 2);
        match &items[0].component {
            Component::Group(inner) => {
                assert_eq!(inner.len(), 2);
                assert_eq!(inner[0].component, lit("I"));
            }
            other => panic!("expected Group, got {other:?}"),
        }
    }

    #[test]
    fn group_quantifier_attaches_to_group() {
        let items = items("(ab)+");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantifier, Some(Quantifier::ONE_OR_MORE));
    }

    #[test]
    fn non_capturing_and_named_groups() {
        for pattern in ["(?:ab)", "(?<word>ab)", "(?P<word>ab)"] {
            match &items(pattern)[0].component {
                Component::Group(inner) => assert_eq!(inner.len(), 2, "{pattern}"),
                other => panic!("expected Group for {pattern}, got {other:?}"),
            }
        }
    }

    #[test]
    fn unterminated_group_runs_to_end() {
        match &items("(ab")[0].component {
            Component::Group(inner) => assert_eq!(inner.len(), 2),
            other => panic!("expected Group, got {other:?}"),
        }
    }

    #[test]
    fn group_alternation_is_nested() {
        match &items("(a|bc)d")[0].component {
            Component::Group(inner) => {
                assert_eq!(inner.len(), 1);
                match &inner[0].component {
                    Component::Alternation(branches) => {
                        assert_eq!(branches.len(), 2);
                        assert_eq!(branches[1].len(), 2);
                    }
                    other => panic!("expected Alternation, got {other:?}"),
                }
            }
            other => panic!("expected Group, got {other:?}"),
        }
    }

    #[test]
    fn nesting_limit() {
        let deep = format!("{}a{}", "(".repeat(5), ")".repeat(5));
        assert!(parse_with_limit(&deep, 5).is_ok());
        assert_eq!(
            parse_with_limit(&deep, 4).unwrap_err(),
            PatternError::NestingTooDeep { limit: 4 }
        );
    }

    // --- Alternation ---

    #[test]
    fn top_level_alternation() {
        let items = items("ab|c");
        assert_eq!(items.len(), 1);
        match &items[0].component {
            Component::Alternation(branches) => {
                assert_eq!(branches.len(), 2);
                assert_eq!(branches[0].len(), 2);
                assert_eq!(branches[1].len(), 1);
            }
            other => panic!("expected Alternation, got {other:?}"),
        }
    }

    #[test]
    fn bar_inside_class_or_group_does_not_split() {
        assert_eq!(items("[a|b]c").len(), 2);
        assert_eq!(items("(a|b)c").len(), 2);
    }

    // --- Anchors and lookahead ---

    #[test]
    fn anchors() {
        let items = items("^a$");
        assert_eq!(items[0].component, Component::Anchor(AnchorKind::Start));
        assert_eq!(items[2].component, Component::Anchor(AnchorKind::End));
    }

    #[test]
    fn length_hint_lookahead() {
        match &items("(?=^.{2,5}$).*")[0].component {
            Component::Lookahead(la) => {
                assert!(!la.negative);
                assert_eq!(la.content, "^.{2,5}$");
                assert_eq!((la.min_length, la.max_length), (Some(2), Some(5)));
                assert!(la.is_length_hint());
            }
            other => panic!("expected Lookahead, got {other:?}"),
        }
    }

    #[test]
    fn single_bound_length_hint() {
        match &items("(?=^.{4}$)")[0].component {
            Component::Lookahead(la) => {
                assert_eq!((la.min_length, la.max_length), (Some(4), Some(4)))
            }
            other => panic!("expected Lookahead, got {other:?}"),
        }
    }

    #[test]
    fn ordinary_lookahead_has_no_hint() {
        match &items("(?=.*[0-9])(?!x)")[..] {
            [first, second] => {
                match &first.component {
                    Component::Lookahead(la) => assert!(!la.is_length_hint()),
                    other => panic!("expected Lookahead, got {other:?}"),
                }
                match &second.component {
                    Component::Lookahead(la) => assert!(la.negative),
                    other => panic!("expected Lookahead, got {other:?}"),
                }
            }
            other => panic!("expected two items, got {other:?}"),
        }
    }

    #[test]
    fn lookahead_not_quantified() {
        let items = items("(?=x)*");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].component, lit("*"));
    }

    // --- Quantifier degradation ---

    #[test]
    fn malformed_quantifier_reads_as_literals() {
        let items = items("a{abc}");
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].component, lit("a"));
        assert_eq!(items[0].quantifier, None);
        assert_eq!(items[1].component, lit("{"));
    }

    #[test]
    fn stray_quantifier_is_literal() {
        let items = items("*a");
        assert_eq!(items[0].component, lit("*"));
        assert_eq!(items[1].component, lit("a"));
    }

    #[test]
    fn stray_quantifier_is_not_repeated() {
        let stars = items("**");
        assert_eq!(stars.len(), 2);
        assert!(stars.iter().all(|item| item.component == lit("*")));
        assert!(stars.iter().all(|item| item.quantifier.is_none()));

        let mixed = items("{+");
        assert_eq!(mixed.len(), 2);
        assert_eq!(mixed[0].quantifier, None);
    }

    #[test]
    fn lazy_modifier_is_absorbed() {
        let items = items("a+?b");
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].quantifier,
            Some(Quantifier {
                min: 1,
                max: Bound::Unbounded
            })
        );
    }
}
