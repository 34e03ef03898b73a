use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::{self, BufRead};

use itertools::Itertools;
use patmask::{DEFAULT_UNBOUNDED_CONSUME_LIMIT, MaskConfig, PatternMask};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mask pattern
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// Raw inputs to format (read from stdin, one per line, when absent)
    #[arg(value_name = "INPUT")]
    inputs: Vec<String>,

    /// Punctuation to keep in raw input besides letters and digits
    #[arg(short = 'a', long, value_name = "CHARS", default_value = "")]
    allow: String,

    /// Characters consumed by an unbounded element
    #[arg(short = 'l', long, default_value_t = DEFAULT_UNBOUNDED_CONSUME_LIMIT)]
    limit: usize,

    /// Placeholder used in the expected format
    #[arg(short = 'p', long, default_value_t = '#')]
    placeholder: char,

    /// Exit with failure if any formatted input does not match the pattern
    #[arg(short = 'c', long)]
    check: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = MaskConfig::default()
        .with_allowed_punctuation(args.allow.chars())
        .with_unbounded_consume_limit(args.limit)
        .with_placeholder(args.placeholder);
    let mask = PatternMask::with_config(args.pattern, config);

    println!("pattern:  {}", mask.pattern());
    println!("length:   {}..={}", mask.min_length(), mask.max_length());
    println!("prefix:   {:?}", mask.prefix());
    println!("format:   {}", mask.expected_format());
    println!(
        "literals: {}",
        mask.literals()
            .iter()
            .map(|l| format!("{:?}@{}", l.text, l.position))
            .join(" ")
    );

    let inputs = if args.inputs.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("Failed to read stdin")?
    } else {
        args.inputs
    };

    let mut invalid = 0usize;
    for input in &inputs {
        let result = mask.format(input);
        let valid = mask.is_valid(&result.formatted_text);
        if !valid {
            invalid += 1;
        }
        println!(
            "{input:?} -> {:?} (cursor {}, {})",
            result.formatted_text,
            result.cursor_position,
            if valid { "valid" } else { "incomplete" }
        );
    }

    if args.check && invalid > 0 {
        bail!(
            "{invalid} input{} did not match the pattern",
            if invalid == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
