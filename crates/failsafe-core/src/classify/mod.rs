//! Failure classification.
//!
//! A [`Classifier`] holds an ordered list of [`Rule`]s and answers one
//! question: is this failure retryable? It is, iff at least one rule matches.
//! Rule order never changes the answer, only how many rules get evaluated.

mod error;
mod rule;
mod taxonomy;

use std::sync::Arc;

pub use error::TaxonomyError;
pub use rule::Rule;
pub use taxonomy::{Category, Taxonomy};

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    taxonomy: Arc<Taxonomy>,
    rules: Vec<Rule>,
}

impl Classifier {
    /// Empty classifier resolving derived categories through `taxonomy`.
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            taxonomy,
            rules: Vec::new(),
        }
    }

    /// Append a rule; rules are never removed or reordered.
    pub fn add(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Rules in insertion order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Hierarchy used to resolve derived-category rules.
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True iff any rule matches. An empty classifier matches nothing.
    pub fn matches(&self, failure: &anyhow::Error) -> bool {
        self.rules.iter().any(|r| r.matches(failure, &self.taxonomy))
    }
}
