//! AST types for mask patterns.

use super::quantifier::Quantifier;

/// A fully parsed pattern: the top-level component sequence.
///
/// When the source has a top-level `|`, `items` holds exactly one
/// [`Component::Alternation`].
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    pub items: Vec<Item>,
}

/// One component plus its optional quantifier.
///
/// An absent quantifier is length-equivalent to `{1,1}` but kept distinct so
/// literal extraction can recognise the plain case.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub component: Component,
    pub quantifier: Option<Quantifier>,
}

impl Item {
    pub fn new(component: Component) -> Self {
        Self {
            component,
            quantifier: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// One source character, an escape pair, or the text of an unterminated
    /// construct. `source` is the raw pattern text, `value` what it matches.
    Literal { source: String, value: String },
    /// `[...]`, `.`, or a shorthand escape such as `\d`. Matches one character.
    CharacterClass(String),
    /// A parenthesised, non-lookahead group.
    Group(Vec<Item>),
    /// A `|` split; exactly one branch participates in a match.
    Alternation(Vec<Vec<Item>>),
    Anchor(AnchorKind),
    Lookahead(Lookahead),
}

impl Component {
    /// A literal whose source text is also its value.
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::Literal {
            source: text.clone(),
            value: text,
        }
    }

    /// Only literals, classes and groups take a quantifier.
    pub fn is_quantifiable(&self) -> bool {
        matches!(
            self,
            Self::Literal { .. } | Self::CharacterClass(_) | Self::Group(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    Start,        // ^
    End,          // $
    WordBoundary, // \b or \B
}

/// A zero-width `(?=...)` / `(?!...)` assertion.
///
/// A positive lookahead shaped `^.{n,m}$` is a length hint; its bounds are
/// kept in `min_length` / `max_length`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookahead {
    pub negative: bool,
    pub content: String,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl Lookahead {
    pub fn is_length_hint(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }
}
