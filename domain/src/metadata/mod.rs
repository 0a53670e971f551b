//! Result metadata
//!
//! [`Metadata`] is an insertion-ordered map attached to every
//! [`AgentResult`](crate::session::response::AgentResult). Values are typed
//! by [`ValueKind`]; merging two containers consults a [`MergePolicy`] that
//! decides, per kind, whether the incoming value replaces the existing one or
//! is combined with it.
//!
//! The standard policy aggregates token usage and concatenates source
//! ledgers. Every other kind is overwritten.

pub mod token_usage;

use crate::tool::source::SourceLedger;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use token_usage::{TokenUsage, UsageRecord};

/// Key under which model invocations report token usage.
pub const TOKEN_USAGE_KEY: &str = "token_usage";

/// Key under which tool provenance is attached.
pub const SOURCES_KEY: &str = "sources";

/// A metadata value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    TokenUsage(UsageRecord),
    Sources(SourceLedger),
    Json(Value),
}

/// Discriminant of [`MetadataValue`], used as the key of a [`MergePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    TokenUsage,
    Sources,
    Json,
}

impl MetadataValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            MetadataValue::TokenUsage(_) => ValueKind::TokenUsage,
            MetadataValue::Sources(_) => ValueKind::Sources,
            MetadataValue::Json(_) => ValueKind::Json,
        }
    }

    pub fn as_token_usage(&self) -> Option<&UsageRecord> {
        match self {
            MetadataValue::TokenUsage(usage) => Some(usage),
            _ => None,
        }
    }

    pub fn as_sources(&self) -> Option<&SourceLedger> {
        match self {
            MetadataValue::Sources(ledger) => Some(ledger),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            MetadataValue::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<TokenUsage> for MetadataValue {
    fn from(usage: TokenUsage) -> Self {
        MetadataValue::TokenUsage(UsageRecord::Single(usage))
    }
}

impl From<UsageRecord> for MetadataValue {
    fn from(usage: UsageRecord) -> Self {
        MetadataValue::TokenUsage(usage)
    }
}

impl From<SourceLedger> for MetadataValue {
    fn from(ledger: SourceLedger) -> Self {
        MetadataValue::Sources(ledger)
    }
}

impl From<Value> for MetadataValue {
    fn from(value: Value) -> Self {
        MetadataValue::Json(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Json(Value::String(value.to_string()))
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Json(Value::String(value))
    }
}

/// Combines an existing value with an incoming one of the same kind.
///
/// Returning `None` falls back to overwriting.
pub type MergeFn = fn(&MetadataValue, &MetadataValue) -> Option<MetadataValue>;

/// Table of merge strategies keyed by value kind.
#[derive(Debug, Clone, Default)]
pub struct MergePolicy {
    strategies: HashMap<ValueKind, MergeFn>,
}

impl MergePolicy {
    /// A policy that overwrites everything.
    pub fn overwrite() -> Self {
        Self::default()
    }

    /// Token usage aggregates, source ledgers concatenate (existing first).
    pub fn standard() -> Self {
        Self::overwrite()
            .with_strategy(ValueKind::TokenUsage, aggregate_usage)
            .with_strategy(ValueKind::Sources, concatenate_sources)
    }

    pub fn with_strategy(mut self, kind: ValueKind, strategy: MergeFn) -> Self {
        self.strategies.insert(kind, strategy);
        self
    }

    /// Resolve the value stored after merging `incoming` over `existing`.
    pub fn resolve(&self, existing: &MetadataValue, incoming: &MetadataValue) -> MetadataValue {
        if existing.kind() == incoming.kind()
            && let Some(strategy) = self.strategies.get(&incoming.kind())
            && let Some(merged) = strategy(existing, incoming)
        {
            return merged;
        }
        incoming.clone()
    }
}

fn aggregate_usage(existing: &MetadataValue, incoming: &MetadataValue) -> Option<MetadataValue> {
    let (existing, incoming) = (existing.as_token_usage()?, incoming.as_token_usage()?);
    Some(MetadataValue::TokenUsage(existing.aggregate(incoming)))
}

fn concatenate_sources(
    existing: &MetadataValue,
    incoming: &MetadataValue,
) -> Option<MetadataValue> {
    let (existing, incoming) = (existing.as_sources()?, incoming.as_sources()?);
    Some(MetadataValue::Sources(existing.merged(incoming)))
}

static STANDARD_POLICY: LazyLock<MergePolicy> = LazyLock::new(MergePolicy::standard);

/// Insertion-ordered metadata map with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, MetadataValue)>,
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a key. An overwritten key keeps its position.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.add(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn token_usage(&self) -> Option<&UsageRecord> {
        self.get(TOKEN_USAGE_KEY)?.as_token_usage()
    }

    pub fn sources(&self) -> Option<&SourceLedger> {
        self.get(SOURCES_KEY)?.as_sources()
    }

    /// Merge `other` into `self` using the standard policy.
    pub fn merge(&mut self, other: &Metadata) {
        self.merge_with(other, &STANDARD_POLICY);
    }

    /// Merge `other` into `self`: every key of `other` is inserted, its value
    /// resolved against an existing one by `policy`.
    pub fn merge_with(&mut self, other: &Metadata, policy: &MergePolicy) {
        for (key, incoming) in &other.entries {
            self.merge_value_with(key, incoming, policy);
        }
    }

    /// Merge a single value under `key` using the standard policy.
    pub fn merge_value(&mut self, key: &str, incoming: impl Into<MetadataValue>) {
        self.merge_value_with(key, &incoming.into(), &STANDARD_POLICY);
    }

    fn merge_value_with(&mut self, key: &str, incoming: &MetadataValue, policy: &MergePolicy) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = policy.resolve(existing, incoming),
            None => self.entries.push((key.to_string(), incoming.clone())),
        }
    }
}

impl<K: Into<String>, V: Into<MetadataValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.add(key, value);
        }
        metadata
    }
}
