//! Token usage accounting
//!
//! A single model invocation reports a [`TokenUsage`]. When several
//! invocations contribute to one answer (tool loops, spliced streams) their
//! records are combined into a [`UsageRecord::Aggregate`], which always keeps
//! the flattened list of original records.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Token counts reported for one model invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Usage whose total is the sum of prompt and completion tokens.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Override the total, for providers that count extra tokens
    /// (cached or reasoning tokens) into it.
    pub fn with_total(mut self, total_tokens: u64) -> Self {
        self.total_tokens = total_tokens;
        self
    }
}

impl Add for TokenUsage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            prompt_tokens: self.prompt_tokens.saturating_add(rhs.prompt_tokens),
            completion_tokens: self.completion_tokens.saturating_add(rhs.completion_tokens),
            total_tokens: self.total_tokens.saturating_add(rhs.total_tokens),
        }
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Usage carried in result metadata: one record, or several aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum UsageRecord {
    Single(TokenUsage),
    Aggregate(Vec<TokenUsage>),
}

impl UsageRecord {
    /// The original records this value stands for.
    pub fn records(&self) -> &[TokenUsage] {
        match self {
            UsageRecord::Single(usage) => std::slice::from_ref(usage),
            UsageRecord::Aggregate(records) => records,
        }
    }

    /// Combine two values into an aggregate of all their original records.
    ///
    /// Aggregates are flattened, so `count()` is always the number of
    /// single invocations that contributed, whatever the merge order.
    pub fn aggregate(&self, other: &UsageRecord) -> UsageRecord {
        let mut records = Vec::with_capacity(self.count() + other.count());
        records.extend_from_slice(self.records());
        records.extend_from_slice(other.records());
        UsageRecord::Aggregate(records)
    }

    pub fn count(&self) -> usize {
        self.records().len()
    }

    /// Sum over every contributing record.
    pub fn totals(&self) -> TokenUsage {
        self.records()
            .iter()
            .fold(TokenUsage::default(), |acc, usage| acc + *usage)
    }

    pub fn prompt_tokens(&self) -> u64 {
        self.totals().prompt_tokens
    }

    pub fn completion_tokens(&self) -> u64 {
        self.totals().completion_tokens
    }

    pub fn total_tokens(&self) -> u64 {
        self.totals().total_tokens
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, UsageRecord::Aggregate(_))
    }
}

impl From<TokenUsage> for UsageRecord {
    fn from(usage: TokenUsage) -> Self {
        UsageRecord::Single(usage)
    }
}
