//! Step-list formatter: compiles a [`Pattern`] into `Consume` / `Insert`
//! steps once, then replays them over raw input to produce masked text.

use super::analyzer::{MaxLength, item_max};
use super::ast::*;
use super::quantifier::{Bound, Quantifier};
use crate::config::MaskConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattingStep {
    /// Copy up to `n` characters of filtered input.
    Consume(usize),
    /// Emit fixed text.
    Insert(String),
    /// Run whichever branch consumes the most input; ties go to the first.
    Choose(Vec<Vec<FormattingStep>>),
}

/// Formatted text and the caret position within it, in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationResult {
    pub formatted_text: String,
    pub cursor_position: usize,
}

/// Compile `pattern` into a step list.
///
/// Unbounded elements consume at most `unbounded_limit` characters.
pub fn compile(pattern: &Pattern, unbounded_limit: usize) -> Vec<FormattingStep> {
    let mut steps = Vec::new();
    compile_items(&pattern.items, unbounded_limit, &mut steps);
    steps
}

fn compile_items(items: &[Item], limit: usize, steps: &mut Vec<FormattingStep>) {
    for item in items {
        let exact = item.quantifier.as_ref().and_then(Quantifier::exact);
        // At most one occurrence: laid out in full, cut short by missing input.
        let at_most_once = item
            .quantifier
            .is_none_or(|q| q.max == Bound::Finite(1));
        let consume_len = || item_max(item).finite().unwrap_or(limit);
        match &item.component {
            Component::Anchor(_) | Component::Lookahead(_) => {}
            Component::Literal { value, .. } => match exact {
                _ if at_most_once => push_insert(steps, value.clone()),
                Some(n) => push_insert(steps, value.repeat(n)),
                None => push_consume(steps, consume_len()),
            },
            Component::CharacterClass(_) => push_consume(steps, consume_len()),
            Component::Group(inner) if at_most_once => compile_items(inner, limit, steps),
            Component::Group(inner) => match (exact, literal_text(inner)) {
                (Some(n), Some(text)) => push_insert(steps, text.repeat(n)),
                _ => push_consume(steps, consume_len()),
            },
            Component::Alternation(branches) => {
                let branches = branches
                    .iter()
                    .map(|branch| {
                        let mut branch_steps = Vec::new();
                        compile_items(branch, limit, &mut branch_steps);
                        branch_steps
                    })
                    .collect();
                steps.push(FormattingStep::Choose(branches));
            }
        }
    }
}

/// The fixed text of a sequence made only of exactly-repeated literals.
fn literal_text(items: &[Item]) -> Option<String> {
    let mut text = String::new();
    for item in items {
        let times = match item.quantifier {
            None => 1,
            Some(q) => q.exact()?,
        };
        let part = match &item.component {
            Component::Literal { value, .. } => value.clone(),
            Component::Group(inner) => literal_text(inner)?,
            Component::Anchor(_) | Component::Lookahead(_) => continue,
            _ => return None,
        };
        text.push_str(&part.repeat(times));
    }
    Some(text)
}

fn push_insert(steps: &mut Vec<FormattingStep>, text: String) {
    if text.is_empty() {
        return;
    }
    match steps.last_mut() {
        Some(FormattingStep::Insert(prev)) => prev.push_str(&text),
        _ => steps.push(FormattingStep::Insert(text)),
    }
}

fn push_consume(steps: &mut Vec<FormattingStep>, n: usize) {
    if n == 0 {
        return;
    }
    match steps.last_mut() {
        Some(FormattingStep::Consume(prev)) => *prev = prev.saturating_add(n),
        _ => steps.push(FormattingStep::Consume(n)),
    }
}

/// Replay `steps` over `raw`, truncating to `max_length` when it is finite.
pub fn apply(
    steps: &[FormattingStep],
    raw: &str,
    max_length: MaxLength,
    config: &MaskConfig,
) -> TransformationResult {
    let input: Vec<char> = raw.chars().filter(|&c| config.keeps(c)).collect();
    let mut replay = Replay::new(config, raw, &input);
    replay.run(steps);

    let mut formatted_text = replay.output;
    let mut len = formatted_text.chars().count();
    if let Some(max) = max_length.finite()
        && len > max
    {
        formatted_text = formatted_text.chars().take(max).collect();
        len = max;
    }

    TransformationResult {
        formatted_text,
        cursor_position: (replay.consumed + replay.inserted).min(len),
    }
}

/// Render the steps as a placeholder template such as `###-###-####`.
///
/// The first branch of each `Choose` is rendered.
pub fn render_template(steps: &[FormattingStep], placeholder: char) -> String {
    let mut out = String::new();
    for step in steps {
        match step {
            FormattingStep::Consume(n) => out.extend(std::iter::repeat_n(placeholder, *n)),
            FormattingStep::Insert(text) => out.push_str(text),
            FormattingStep::Choose(branches) => {
                if let Some(first) = branches.first() {
                    out.push_str(&render_template(first, placeholder));
                }
            }
        }
    }
    out
}

/// Replay state over filtered input.
#[derive(Clone)]
struct Replay<'a> {
    config: &'a MaskConfig,
    /// Unfiltered input, used to recognise text typed in the pattern's layout.
    raw: &'a str,
    input: &'a [char],
    /// Next unread input character.
    pos: usize,
    /// Characters copied by `Consume` steps.
    consumed: usize,
    /// Characters emitted by `Insert` steps.
    inserted: usize,
    output: String,
    halted: bool,
    /// Replaying a trial branch of a `Choose`.
    in_choice: bool,
}

impl<'a> Replay<'a> {
    fn new(config: &'a MaskConfig, raw: &'a str, input: &'a [char]) -> Self {
        Self {
            config,
            raw,
            input,
            pos: 0,
            consumed: 0,
            inserted: 0,
            output: String::new(),
            halted: false,
            in_choice: false,
        }
    }

    fn remaining(&self) -> &'a [char] {
        &self.input[self.pos..]
    }

    fn run(&mut self, steps: &[FormattingStep]) {
        for step in steps {
            if self.halted {
                return;
            }
            match step {
                FormattingStep::Consume(n) => self.consume(*n),
                FormattingStep::Insert(text) => self.insert(text),
                FormattingStep::Choose(branches) => self.choose(branches),
            }
        }
    }

    fn consume(&mut self, n: usize) {
        let remaining = self.remaining();
        if remaining.is_empty() {
            self.halted = true;
            return;
        }
        let taken = &remaining[..n.min(remaining.len())];
        self.output.extend(taken);
        self.pos += taken.len();
        self.consumed += taken.len();
    }

    /// Literals are shown ahead of more input. Without input, only a leading
    /// literal is shown, and inside a `Choose` only into empty output.
    fn insert(&mut self, text: &str) {
        if self.remaining().is_empty() {
            let leading = self.consumed == 0 && (self.output.is_empty() || !self.in_choice);
            if !leading {
                self.halted = true;
                return;
            }
        }
        self.output.push_str(text);
        self.inserted += text.chars().count();

        // Input already laid out like the output so far carries the literal too.
        let echo: Vec<char> = text.chars().filter(|&c| self.config.keeps(c)).collect();
        if !echo.is_empty()
            && self.raw.starts_with(self.output.as_str())
            && self.remaining().starts_with(&echo)
        {
            self.pos += echo.len();
        }
    }

    fn choose(&mut self, branches: &[Vec<FormattingStep>]) {
        let in_choice = self.in_choice;
        let mut best: Option<Replay<'a>> = None;
        for branch in branches {
            let mut trial = self.clone();
            trial.in_choice = true;
            trial.run(branch);
            if best.as_ref().is_none_or(|b| trial.pos > b.pos) {
                best = Some(trial);
            }
        }
        if let Some(best) = best {
            *self = best;
            self.in_choice = in_choice;
        }
    }
}
