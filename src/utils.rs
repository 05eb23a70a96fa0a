use std::io;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Custom error types for the grammar sampler
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid grammar: {0}")]
    InvalidGrammar(String),

    #[error("Axiom is not the left-hand side of any rule: {0}")]
    InvalidAxiom(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("No rule to expand non-terminal: {0}")]
    EmptyRuleSet(String),

    #[error("Expansion step limit of {limit} exceeded while expanding {symbol}")]
    StepLimitExceeded { limit: usize, symbol: String },
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;

/// Source of the choices made while expanding a tree.
///
/// Every random decision of the generator goes through this trait, so
/// swapping the implementation is enough to make generation reproducible.
pub trait RuleChooser {
    /// Pick an index in `0..len`, or `None` when `len` is zero.
    fn choose(&mut self, len: usize) -> Option<usize>;
}

impl<C: RuleChooser + ?Sized> RuleChooser for &mut C {
    fn choose(&mut self, len: usize) -> Option<usize> {
        (**self).choose(len)
    }
}

/// Uniform choice backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RandomChooser<R> {
    rng: R,
}

impl<R: Rng> RandomChooser<R> {
    /// Wrap an existing random number generator
    pub fn new(rng: R) -> Self {
        RandomChooser { rng }
    }

    /// Give back the wrapped generator
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RandomChooser<StdRng> {
    /// A chooser seeded from the operating system
    pub fn from_entropy() -> Self {
        RandomChooser::new(StdRng::from_entropy())
    }

    /// A chooser whose choices are fully determined by `seed`
    pub fn seeded(seed: u64) -> Self {
        RandomChooser::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RuleChooser for RandomChooser<R> {
    fn choose(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }
}

/// Replays a fixed script of choices, cycling when it runs out.
///
/// Each scripted index is reduced modulo the number of candidates, so a
/// script never selects out of range.
#[derive(Debug, Clone)]
pub struct SequenceChooser {
    script: Vec<usize>,
    position: usize,
}

impl SequenceChooser {
    pub fn new(script: Vec<usize>) -> Self {
        SequenceChooser { script, position: 0 }
    }

    /// Always pick the first candidate
    pub fn first() -> Self {
        SequenceChooser::new(vec![0])
    }

    /// Number of choices made so far
    pub fn choices_made(&self) -> usize {
        self.position
    }
}

impl RuleChooser for SequenceChooser {
    fn choose(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let scripted = if self.script.is_empty() {
            0
        } else {
            self.script[self.position % self.script.len()]
        };
        self.position += 1;
        Some(scripted % len)
    }
}

/// Trait extension for Option<T> to convert to GrammarError
pub trait OptionExt<T> {
    fn ok_or_grammar_err<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_grammar_err<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.ok_or_else(|| GrammarError::InvalidGrammar(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_chooser_stays_in_range() {
        let mut chooser = RandomChooser::seeded(7);
        for len in 1..50 {
            let picked = chooser.choose(len).unwrap();
            assert!(picked < len);
        }
        assert_eq!(chooser.choose(0), None);
    }

    #[test]
    fn test_seeded_choosers_agree() {
        let mut a = RandomChooser::seeded(42);
        let mut b = RandomChooser::seeded(42);
        let left: Vec<_> = (0..32).map(|_| a.choose(10)).collect();
        let right: Vec<_> = (0..32).map(|_| b.choose(10)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_sequence_chooser_cycles_and_wraps() {
        let mut chooser = SequenceChooser::new(vec![1, 5]);
        assert_eq!(chooser.choose(3), Some(1));
        assert_eq!(chooser.choose(3), Some(2));
        assert_eq!(chooser.choose(3), Some(1));
        assert_eq!(chooser.choose(0), None);
        assert_eq!(chooser.choices_made(), 3);
    }

    #[test]
    fn test_option_ext() {
        let missing: Option<u8> = None;
        let err = missing.ok_or_grammar_err(|| "nothing here".to_string());
        assert!(matches!(err, Err(GrammarError::InvalidGrammar(msg)) if msg == "nothing here"));
    }
}
