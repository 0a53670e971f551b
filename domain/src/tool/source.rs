//! Provenance records contributed by tools

use serde::{Deserialize, Serialize};

/// A piece of provenance: where some tool output came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    name: String,
    reference: String,
    content: String,
}

impl Source {
    pub fn new(
        name: impl Into<String>,
        reference: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered collection of [`Source`]s.
///
/// A ledger attached to result metadata is treated as frozen: merging
/// produces a new ledger instead of appending to either side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLedger {
    sources: Vec<Source>,
}

impl SourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: Source) {
        self.sources.push(source);
    }

    /// Append every source of `other`, keeping order.
    pub fn extend_from(&mut self, other: &SourceLedger) {
        self.sources.extend(other.sources.iter().cloned());
    }

    /// Concatenation of `self` followed by `other`.
    pub fn merged(&self, other: &SourceLedger) -> SourceLedger {
        let mut merged = self.clone();
        merged.extend_from(other);
        merged
    }

    pub fn all(&self) -> &[Source] {
        &self.sources
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Source> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl From<Vec<Source>> for SourceLedger {
    fn from(sources: Vec<Source>) -> Self {
        Self { sources }
    }
}

impl FromIterator<Source> for SourceLedger {
    fn from_iter<I: IntoIterator<Item = Source>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SourceLedger {
    type Item = &'a Source;
    type IntoIter = std::slice::Iter<'a, Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}
