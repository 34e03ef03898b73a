//! Repetition bounds attached to quantifiable pattern elements.

use std::fmt;

/// Upper bound of a [`Quantifier`].
///
/// `Unbounded` is a tag, never a large integer, so that length arithmetic
/// cannot overflow by multiplying against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Finite(usize),
    Unbounded,
}

/// A `{min, max}` repetition bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    pub min: usize,
    pub max: Bound,
}

impl Quantifier {
    pub const ZERO_OR_MORE: Self = Self {
        min: 0,
        max: Bound::Unbounded,
    };
    pub const ONE_OR_MORE: Self = Self {
        min: 1,
        max: Bound::Unbounded,
    };
    pub const OPTIONAL: Self = Self {
        min: 0,
        max: Bound::Finite(1),
    };

    pub fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Bound::Finite(n),
        }
    }

    /// `Some(n)` when the bound is `{n,n}`.
    pub fn exact(&self) -> Option<usize> {
        match self.max {
            Bound::Finite(max) if max == self.min => Some(max),
            _ => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max == Bound::Unbounded
    }
}

/// True for an absent quantifier or an explicit `{1,1}`.
pub fn is_basic(quantifier: Option<&Quantifier>) -> bool {
    quantifier.is_none_or(|q| q.exact() == Some(1))
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, Bound::Unbounded) => write!(f, "*"),
            (1, Bound::Unbounded) => write!(f, "+"),
            (0, Bound::Finite(1)) => write!(f, "?"),
            (n, Bound::Unbounded) => write!(f, "{{{n},}}"),
            (n, Bound::Finite(m)) if n == m => write!(f, "{{{n}}}"),
            (n, Bound::Finite(m)) => write!(f, "{{{n},{m}}}"),
        }
    }
}

/// Parse a quantifier at the start of `chars`.
///
/// Returns the quantifier and the number of characters it occupies, or `None`
/// when `chars` does not begin with a well-formed quantifier. Malformed brace
/// forms (`{abc}`, `{3`, `{,2}`, `{5,2}`) are not errors: the caller treats
/// the element as unquantified and re-reads the brace text as literals.
pub fn parse_quantifier(chars: &[char]) -> Option<(Quantifier, usize)> {
    match chars.first()? {
        '*' => Some((Quantifier::ZERO_OR_MORE, 1)),
        '+' => Some((Quantifier::ONE_OR_MORE, 1)),
        '?' => Some((Quantifier::OPTIONAL, 1)),
        '{' => parse_braced(chars),
        _ => None,
    }
}

fn parse_braced(chars: &[char]) -> Option<(Quantifier, usize)> {
    let close = chars.iter().position(|&c| c == '}')?;
    let body: String = chars[1..close].iter().collect();
    let quantifier = match body.split_once(',') {
        None => Quantifier::exactly(parse_count(&body)?),
        Some((min, "")) => Quantifier {
            min: parse_count(min)?,
            max: Bound::Unbounded,
        },
        Some((min, max)) => {
            let (min, max) = (parse_count(min)?, parse_count(max)?);
            if max < min {
                return None;
            }
            Quantifier {
                min,
                max: Bound::Finite(max),
            }
        }
    };
    Some((quantifier, close + 1))
}

fn parse_count(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
