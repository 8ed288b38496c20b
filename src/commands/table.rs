//! Verb phrase → category lookup for one dialect.

use std::collections::HashMap;

use super::Classification;
use crate::config::VerbConfig;
use crate::error::ConfigError;
use crate::eval::CommandCategory;
use crate::parse::CommandType;

/// Read-only map from verb phrases (one or more words) to categories.
///
/// Lookup compares whole tokens from the start of the command and prefers the
/// longest matching phrase, so `auth can-i` and `auth reconcile` can carry
/// different categories. Anything unmatched is `Unknown`.
#[derive(Debug)]
pub struct VerbTable {
    dialect: CommandType,
    verbs: HashMap<Vec<String>, CommandCategory>,
    /// Phrases in configuration order, for tool descriptions.
    ordered: Vec<(String, CommandCategory)>,
    max_words: usize,
}

impl VerbTable {
    /// Build a table, rejecting any phrase listed under two categories.
    pub fn from_config(dialect: CommandType, config: &VerbConfig) -> Result<Self, ConfigError> {
        let mut table = Self {
            dialect,
            verbs: HashMap::new(),
            ordered: Vec::new(),
            max_words: 0,
        };
        let lists = [
            (CommandCategory::Read, &config.read),
            (CommandCategory::Write, &config.write),
            (CommandCategory::Admin, &config.admin),
        ];
        for (category, phrases) in lists {
            for phrase in phrases {
                table.insert(phrase, category)?;
            }
        }
        Ok(table)
    }

    fn insert(&mut self, phrase: &str, category: CommandCategory) -> Result<(), ConfigError> {
        let words: Vec<String> = phrase.split_whitespace().map(String::from).collect();
        if words.is_empty() {
            return Ok(());
        }
        let joined = words.join(" ");
        match self.verbs.get(&words) {
            Some(existing) if *existing != category => Err(ConfigError::DuplicateVerb {
                dialect: self.dialect.to_string(),
                verb: joined,
            }),
            Some(_) => Ok(()),
            None => {
                self.max_words = self.max_words.max(words.len());
                self.verbs.insert(words, category);
                self.ordered.push((joined, category));
                Ok(())
            }
        }
    }

    /// Classify a token sequence (binary prefix already removed).
    pub fn classify(&self, tokens: &[String]) -> Classification {
        let limit = self.max_words.min(tokens.len());
        for len in (1..=limit).rev() {
            if let Some(&category) = self.verbs.get(&tokens[..len]) {
                return Classification {
                    verb: tokens[..len].join(" "),
                    category,
                    verb_len: len,
                };
            }
        }
        Classification {
            verb: tokens.first().cloned().unwrap_or_default(),
            category: CommandCategory::Unknown,
            verb_len: tokens.len().min(1),
        }
    }

    /// Phrases of one category, in configuration order.
    pub fn verbs(&self, category: CommandCategory) -> Vec<&str> {
        self.ordered
            .iter()
            .filter(|(_, c)| *c == category)
            .map(|(v, _)| v.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}
