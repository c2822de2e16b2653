//! Confidence scoring constants.
//!
//! These values are heuristic calibrations carried over from production use,
//! not derived quantities; recalibrating them is a product decision. The
//! ceilings are ordered dynamic (0.98) > pattern (0.95) on purpose: content
//! reachable only after script execution is strong evidence the cheaper
//! strategies structurally cannot see it, while raw-text extraction is the
//! most permissive technique and so the least precise.

/// Selector detector: base confidence for a single probe match.
pub const SELECTOR_BASE: f64 = 0.65;
/// Selector detector: increment per matched link.
pub const SELECTOR_PER_MATCH: f64 = 0.10;
/// Selector detector: confidence ceiling.
pub const SELECTOR_CAP: f64 = 0.99;

/// Pattern detector: base confidence when any URL survives validation.
pub const PATTERN_BASE: f64 = 0.50;
/// Pattern detector: increment per surviving URL.
pub const PATTERN_PER_URL: f64 = 0.05;
/// Pattern detector: bonus when a qualifying shared pattern was inferred.
pub const PATTERN_BONUS: f64 = 0.15;
/// Pattern detector: confidence ceiling.
pub const PATTERN_CAP: f64 = 0.95;

/// Minimum share of extracted URLs a pattern template must cover to qualify.
pub const PATTERN_COVERAGE_MIN: f64 = 0.50;

/// Dynamic detector: base confidence when rendering yields any URL.
pub const DYNAMIC_BASE: f64 = 0.85;
/// Dynamic detector: increment per URL.
pub const DYNAMIC_PER_URL: f64 = 0.02;
/// Dynamic detector: confidence ceiling.
pub const DYNAMIC_CAP: f64 = 0.98;

/// Discovery floor: results scoring below this are discarded outright.
pub const MIN_CONFIDENCE: f64 = 0.50;
