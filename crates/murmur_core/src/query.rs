//! Filter normalization for history and reaction searches
//!
//! Tool callers hand over loosely typed JSON. Everything here turns that
//! into a validated, capped query before any platform call is made.

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{HotConfig, LimitsConfig};
use crate::error::{MurmurError, Result};
use crate::timestamp::parse_timestamp;

/// Filtering options for message retrieval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MessageFilter {
    /// Number of messages to fetch (max 500, default 10)
    #[schemars(with = "Option<u32>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,

    /// ISO timestamp - retrieve messages before this time (YYYY-MM-DDTHH:MM:SS.sssZ)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,

    /// ISO timestamp - retrieve messages after this time (YYYY-MM-DDTHH:MM:SS.sssZ)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,

    /// If true, return messages oldest to newest; otherwise newest to oldest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oldest_first: Option<bool>,
}

/// Criteria for finding highly reacted messages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReactionFilter {
    /// Minimum total reactions (default 5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_reactions: Option<u64>,

    /// Minimum number of distinct reaction emojis (default 2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_reaction_types: Option<usize>,

    /// Any of these emojis marks a message as hot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_emojis: Option<Vec<String>>,

    /// Number of messages to scan (max 500, default 50)
    #[schemars(with = "Option<u32>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,

    /// ISO timestamp upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,

    /// ISO timestamp lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// A validated history request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Always within `1..=max_history`
    pub limit: u32,
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
    /// `None` when the caller did not ask for an order
    pub oldest_first: Option<bool>,
}

impl HistoryQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            before: None,
            after: None,
            oldest_first: None,
        }
    }

    pub fn from_filter(filter: &MessageFilter, limits: &LimitsConfig) -> Result<Self> {
        let limit = coerce_limit(
            filter.limit.as_ref(),
            limits.default_history,
            limits.max_history,
        )?;

        Ok(Self {
            limit,
            before: parse_bound("before", filter.before.as_deref())?,
            after: parse_bound("after", filter.after.as_deref())?,
            oldest_first: filter.oldest_first,
        })
    }

    pub fn is_oldest_first(&self) -> bool {
        self.oldest_first.unwrap_or(false)
    }

    /// Whether an instant falls inside the before/after window
    pub fn admits(&self, instant: DateTime<Utc>) -> bool {
        self.before.is_none_or(|before| instant < before)
            && self.after.is_none_or(|after| instant > after)
    }

    /// One-line description of the applied filters, e.g. `limit=10, before=...`
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("limit={}", self.limit)];
        if let Some(oldest_first) = self.oldest_first {
            parts.push(format!("oldest_first={oldest_first}"));
        }
        if let Some(before) = self.before {
            parts.push(format!("before={}", iso(before)));
        }
        if let Some(after) = self.after {
            parts.push(format!("after={}", iso(after)));
        }
        parts.join(", ")
    }
}

/// Resolved hot-message criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotCriteria {
    pub min_reactions: u64,
    pub min_reaction_types: usize,
    pub target_emojis: Vec<String>,
    pub limit: u32,
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
}

impl Default for HotCriteria {
    fn default() -> Self {
        let hot = HotConfig::default();
        Self {
            min_reactions: hot.min_reactions,
            min_reaction_types: hot.min_reaction_types,
            target_emojis: hot.target_emojis,
            limit: LimitsConfig::default().default_hot,
            before: None,
            after: None,
        }
    }
}

impl HotCriteria {
    pub fn from_filter(
        filter: &ReactionFilter,
        hot: &HotConfig,
        limits: &LimitsConfig,
    ) -> Result<Self> {
        Ok(Self {
            min_reactions: filter.min_reactions.unwrap_or(hot.min_reactions),
            min_reaction_types: filter.min_reaction_types.unwrap_or(hot.min_reaction_types),
            target_emojis: filter
                .target_emojis
                .clone()
                .unwrap_or_else(|| hot.target_emojis.clone()),
            limit: coerce_limit(filter.limit.as_ref(), limits.default_hot, limits.max_history)?,
            before: parse_bound("before", filter.before.as_deref())?,
            after: parse_bound("after", filter.after.as_deref())?,
        })
    }

    /// The history window scanned for candidates
    pub fn history_query(&self) -> HistoryQuery {
        HistoryQuery {
            limit: self.limit,
            before: self.before,
            after: self.after,
            oldest_first: None,
        }
    }
}

/// Coerce a loosely typed limit into `1..=max`.
///
/// Numbers are truncated, numeric strings are accepted, absent or null
/// falls back to `default`. Values above `max` clamp silently.
pub fn coerce_limit(value: Option<&Value>, default: u32, max: u32) -> Result<u32> {
    let requested: i64 = match value {
        None | Some(Value::Null) => i64::from(default),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i,
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
                .ok_or_else(|| limit_error(&n.to_string()))?,
        },
        Some(Value::String(s)) => s.trim().parse().map_err(|_| limit_error(s))?,
        Some(other) => return Err(limit_error(&other.to_string())),
    };

    if requested < 1 {
        return Err(MurmurError::invalid_filter(
            "limit",
            format!("{requested} is below the minimum of 1"),
            format!("an integer between 1 and {max}"),
        ));
    }

    Ok(u32::try_from(requested).unwrap_or(u32::MAX).min(max))
}

fn limit_error(raw: &str) -> MurmurError {
    MurmurError::invalid_filter(
        "limit",
        format!("'{raw}' is not a number"),
        "an integer message count",
    )
}

/// Absent or null means unbounded on that side
fn parse_bound(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value.map(|raw| parse_timestamp(field, raw)).transpose()
}

fn iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
