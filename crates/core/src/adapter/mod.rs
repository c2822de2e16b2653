//! Adapter value model.
//!
//! An adapter records which detection strategy (and its parameters) reliably
//! finds PDF links on a domain. Adapters are persisted in a JSON collection
//! (see [`store`]) and looked up by domain before any fresh detection runs.
//!
//! The strategy is a sum type: a `selector` adapter carries a CSS selector
//! and nothing else, a `pattern` adapter carries a URL pattern and nothing
//! else, and a `javascript` adapter carries neither. Records that violate
//! this shape fail deserialization.

pub mod domain;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version of the adapter collection file.
pub const SCHEMA_VERSION: &str = "1.0";

/// The detection strategy recorded by an adapter, with only the parameters
/// valid for that kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// A CSS selector probe that matched link-bearing elements.
    Selector { selector: String },
    /// A shared URL pattern inferred from raw-text extraction.
    Pattern { pattern: String },
    /// Headless-browser rendering; no parameters, the strategy is re-run.
    Dynamic,
}

impl Strategy {
    /// The bare discriminant, used for ranking priority.
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Selector { .. } => StrategyKind::Selector,
            Strategy::Pattern { .. } => StrategyKind::Pattern,
            Strategy::Dynamic => StrategyKind::Dynamic,
        }
    }
}

/// Strategy discriminant without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Selector,
    Pattern,
    Dynamic,
}

impl StrategyKind {
    /// Name used in the persisted JSON (`dynamic` serializes as
    /// `"javascript"` for compatibility with existing adapter files).
    pub fn wire_name(self) -> &'static str {
        match self {
            StrategyKind::Selector => "selector",
            StrategyKind::Pattern => "pattern",
            StrategyKind::Dynamic => "javascript",
        }
    }

    /// Fixed tie-break priority: dynamic > pattern > selector.
    pub fn priority(self) -> u8 {
        match self {
            StrategyKind::Dynamic => 3,
            StrategyKind::Pattern => 2,
            StrategyKind::Selector => 1,
        }
    }
}

/// A persisted detection strategy bound to one or more domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "AdapterRecord", try_from = "AdapterRecord")]
pub struct Adapter {
    /// Unique id within the collection.
    pub id: String,
    /// Domains this adapter applies to (matched via base-domain reduction).
    pub domains: Vec<String>,
    /// The recorded strategy and its parameters.
    pub strategy: Strategy,
    /// Heuristic confidence in [0,1] at acceptance time.
    pub confidence: f64,
    /// When the adapter was accepted.
    pub date_added: DateTime<Utc>,
    /// Optional free-form note.
    pub description: Option<String>,
}

impl Adapter {
    /// Create an adapter dated now.
    pub fn new(
        id: impl Into<String>,
        domains: Vec<String>,
        strategy: Strategy,
        confidence: f64,
        description: Option<String>,
    ) -> Self {
        Self { id: id.into(), domains, strategy, confidence, date_added: Utc::now(), description }
    }
}

/// Flat wire shape of an adapter, matching the persisted JSON field-for-field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdapterRecord {
    id: String,
    domains: Vec<String>,
    strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    confidence: f64,
    date_added: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl From<Adapter> for AdapterRecord {
    fn from(adapter: Adapter) -> Self {
        let strategy = adapter.strategy.kind().wire_name().to_string();
        let (selector, pattern) = match adapter.strategy {
            Strategy::Selector { selector } => (Some(selector), None),
            Strategy::Pattern { pattern } => (None, Some(pattern)),
            Strategy::Dynamic => (None, None),
        };

        Self {
            id: adapter.id,
            domains: adapter.domains,
            strategy,
            selector,
            pattern,
            confidence: adapter.confidence,
            date_added: adapter.date_added,
            description: adapter.description,
        }
    }
}

impl TryFrom<AdapterRecord> for Adapter {
    type Error = String;

    fn try_from(record: AdapterRecord) -> Result<Self, Self::Error> {
        let strategy = match record.strategy.as_str() {
            "selector" => {
                let selector = record
                    .selector
                    .ok_or_else(|| format!("adapter {}: selector strategy without selector", record.id))?;
                Strategy::Selector { selector }
            }
            "pattern" => {
                let pattern = record
                    .pattern
                    .ok_or_else(|| format!("adapter {}: pattern strategy without pattern", record.id))?;
                Strategy::Pattern { pattern }
            }
            "javascript" => Strategy::Dynamic,
            other => return Err(format!("adapter {}: unknown strategy {:?}", record.id, other)),
        };

        if !(0.0..=1.0).contains(&record.confidence) {
            return Err(format!("adapter {}: confidence {} out of [0,1]", record.id, record.confidence));
        }

        Ok(Self {
            id: record.id,
            domains: record.domains,
            strategy,
            confidence: record.confidence,
            date_added: record.date_added,
            description: record.description,
        })
    }
}

/// The persisted collection: insertion-ordered adapters under a schema version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterCollection {
    /// Schema version string.
    pub version: String,
    /// Adapters in insertion order; ids unique (enforced by [`Self::upsert`]).
    pub adapters: Vec<Adapter>,
}

impl Default for AdapterCollection {
    fn default() -> Self {
        Self { version: SCHEMA_VERSION.to_string(), adapters: Vec::new() }
    }
}

impl AdapterCollection {
    /// Replace the adapter sharing `adapter.id`, else append.
    ///
    /// Persistence is the caller's responsibility (see [`store::save`]).
    pub fn upsert(&mut self, adapter: Adapter) {
        match self.adapters.iter_mut().find(|a| a.id == adapter.id) {
            Some(existing) => *existing = adapter,
            None => self.adapters.push(adapter),
        }
    }

    /// Remove the adapter with the given id. Returns whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.adapters.len();
        self.adapters.retain(|a| a.id != id);
        self.adapters.len() != before
    }

    /// Look up an adapter by id.
    pub fn get(&self, id: &str) -> Option<&Adapter> {
        self.adapters.iter().find(|a| a.id == id)
    }

    /// Find the best adapter for a host.
    ///
    /// Two-tier matching: a registered domain matches if it reduces to the
    /// same base domain as the target (so `example.com` covers
    /// `cdn.example.com`), or if it equals the normalized target exactly
    /// (covers shapes base-reduction mishandles, e.g. single-label hosts).
    /// Among all matches the highest-confidence adapter wins.
    pub fn find_for_domain(&self, host: &str) -> Option<&Adapter> {
        let target = domain::normalize(host);
        if target.is_empty() {
            return None;
        }
        let target_base = domain::base_domain(&target);

        let mut best: Option<&Adapter> = None;
        for adapter in &self.adapters {
            let matched = adapter.domains.iter().any(|d| {
                let registered = domain::normalize(d);
                registered == target || domain::base_domain(&registered) == target_base
            });
            if matched && best.is_none_or(|b| adapter.confidence > b.confidence) {
                best = Some(adapter);
            }
        }
        best
    }
}
