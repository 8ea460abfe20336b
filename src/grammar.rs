//! Grammar storage and bounded generation-by-generation expansion.

use crate::error::GrammarError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Default ceiling on the number of symbols a single expansion may produce.
pub const DEFAULT_MAX_SYMBOLS: usize = 5_000_000;

/// An axiom plus its substitution rules.
///
/// Symbols without a rule are terminals and are copied through unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    /// Level 0 of the system.
    pub axiom: String,
    /// Symbol to replacement. Replacements may be empty (erasing rules).
    pub rules: HashMap<char, String>,
}

impl Grammar {
    pub fn new(axiom: impl Into<String>) -> Self {
        Self {
            axiom: axiom.into(),
            rules: HashMap::new(),
        }
    }

    /// Adds or replaces the rule for `symbol` (builder pattern).
    pub fn with_rule(mut self, symbol: char, replacement: impl Into<String>) -> Self {
        self.rules.insert(symbol, replacement.into());
        self
    }

    /// Builds a grammar from rules written as whitespace separated pairs.
    ///
    /// `"A AB B B+A"` is equivalent to `{'A': "AB", 'B': "B+A"}`. Later pairs for
    /// the same key win.
    pub fn parse(axiom: impl Into<String>, rules: &str) -> Result<Self, GrammarError> {
        Ok(Self {
            axiom: axiom.into(),
            rules: parse_rules(rules)?,
        })
    }
}

/// Parses `"key replacement key replacement ..."` into a rule map.
pub fn parse_rules(text: &str) -> Result<HashMap<char, String>, GrammarError> {
    let mut rules = HashMap::new();
    let mut tokens = text.split_whitespace();

    while let Some(key) = tokens.next() {
        let mut chars = key.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(GrammarError::InvalidRuleKey(key.to_string())),
        };
        let replacement = tokens
            .next()
            .ok_or(GrammarError::MissingReplacement(symbol))?;
        rules.insert(symbol, replacement.to_string());
    }

    Ok(rules)
}

/// Rewrites axioms generation by generation, refusing to grow past `max_symbols`.
#[derive(Clone, Copy, Debug)]
pub struct GrammarExpander {
    max_symbols: usize,
}

impl Default for GrammarExpander {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SYMBOLS)
    }
}

impl GrammarExpander {
    pub fn new(max_symbols: usize) -> Self {
        Self { max_symbols }
    }

    pub fn max_symbols(&self) -> usize {
        self.max_symbols
    }

    /// Expands `grammar.axiom` through `generations` rewriting steps.
    ///
    /// Zero generations returns the axiom as-is. The length of every generation is
    /// computed before it is built, so a runaway rule fails with
    /// [`GrammarError::LengthCapExceeded`] without allocating the oversized string.
    pub fn expand(&self, grammar: &Grammar, generations: u32) -> Result<String, GrammarError> {
        let mut current = grammar.axiom.clone();
        let lengths = replacement_lengths(&grammar.rules);
        for generation in 1..=generations {
            current = self.step(&current, grammar, &lengths, generation)?;
        }
        Ok(current)
    }

    /// Like [`expand`](Self::expand) but keeps every level `0..=generations`.
    pub fn expand_levels(
        &self,
        grammar: &Grammar,
        generations: u32,
    ) -> Result<Vec<String>, GrammarError> {
        let lengths = replacement_lengths(&grammar.rules);
        let mut levels = Vec::with_capacity(generations as usize + 1);
        levels.push(grammar.axiom.clone());
        for generation in 1..=generations {
            let next = self.step(&levels[levels.len() - 1], grammar, &lengths, generation)?;
            levels.push(next);
        }
        Ok(levels)
    }

    fn step(
        &self,
        current: &str,
        grammar: &Grammar,
        lengths: &HashMap<char, usize>,
        generation: u32,
    ) -> Result<String, GrammarError> {
        let length = current
            .chars()
            .map(|c| lengths.get(&c).copied().unwrap_or(1))
            .fold(0usize, usize::saturating_add);
        if length > self.max_symbols {
            return Err(GrammarError::LengthCapExceeded {
                generation,
                length,
                cap: self.max_symbols,
            });
        }

        let mut next = String::with_capacity(length);
        for c in current.chars() {
            match grammar.rules.get(&c) {
                Some(replacement) => next.push_str(replacement),
                None => next.push(c),
            }
        }
        debug!(generation, length, "expanded generation");
        Ok(next)
    }
}

fn replacement_lengths(rules: &HashMap<char, String>) -> HashMap<char, usize> {
    rules
        .iter()
        .map(|(&symbol, replacement)| (symbol, replacement.chars().count()))
        .collect()
}

/// Expands `axiom` with `rules` using the default symbol cap.
pub fn expand(
    axiom: &str,
    rules: &HashMap<char, String>,
    generations: u32,
) -> Result<String, GrammarError> {
    let grammar = Grammar {
        axiom: axiom.to_string(),
        rules: rules.clone(),
    };
    GrammarExpander::default().expand(&grammar, generations)
}
