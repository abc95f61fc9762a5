//! Schedule: daily time blocks mapping a time of day to a target temperature.
//!
//! Blocks come straight from the configuration snapshot and are kept in
//! their raw form ([`ScheduleBlock`]). Each block is parsed on demand into a
//! [`TimeBlock`]; a malformed block is skipped individually and never
//! prevents the remaining blocks from resolving.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::parse_time_of_day;

/// Maximum number of blocks a zone schedule may hold.
pub const MAX_BLOCKS: usize = 4;

/// A schedule block as entered in the configuration.
///
/// Every field is optional so that a half-filled block can still be
/// loaded and reported instead of rejecting the whole configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    /// Number or numeric string.
    #[serde(default)]
    pub temp: Option<serde_json::Value>,
}

impl ScheduleBlock {
    /// Convenience constructor for a fully specified block.
    #[must_use]
    pub fn new(label: &str, start: &str, end: &str, temp: f64) -> Self {
        Self {
            label: Some(label.to_string()),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            temp: Some(serde_json::Value::from(temp)),
        }
    }

    /// Parse the raw block into a validated [`TimeBlock`].
    ///
    /// # Errors
    ///
    /// Returns a [`BlockError`] naming the first missing or invalid field.
    pub fn parse(&self) -> Result<TimeBlock, BlockError> {
        let start = self.start.as_deref().ok_or(BlockError::MissingField("start"))?;
        let end = self.end.as_deref().ok_or(BlockError::MissingField("end"))?;
        let temp = self.temp.as_ref().ok_or(BlockError::MissingField("temp"))?;

        let start =
            parse_time_of_day(start).ok_or_else(|| BlockError::InvalidTime(start.to_string()))?;
        let end = parse_time_of_day(end).ok_or_else(|| BlockError::InvalidTime(end.to_string()))?;
        let temperature = match temp {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|t| t.is_finite())
        .ok_or_else(|| BlockError::InvalidTemperature(temp.to_string()))?;

        Ok(TimeBlock {
            start,
            end,
            temperature,
        })
    }
}

/// Why a [`ScheduleBlock`] could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("unparsable time {0:?}")]
    InvalidTime(String),
    #[error("non-numeric temperature {0}")]
    InvalidTemperature(String),
}

/// A parsed, usable schedule block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBlock {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub temperature: f64,
}

impl TimeBlock {
    /// Whether `now` falls inside this block.
    ///
    /// `start <= end` is a same-day range `[start, end)`; `start > end`
    /// wraps past midnight and matches `now >= start || now < end`.
    #[must_use]
    pub fn contains(&self, now: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= now && now < self.end
        } else {
            now >= self.start || now < self.end
        }
    }
}

/// Ordered list of schedule blocks for one zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(Vec<ScheduleBlock>);

impl Schedule {
    /// Build a schedule, enforcing the block count limit.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooManyBlocks`] when more than
    /// [`MAX_BLOCKS`] blocks are given.
    pub fn new(blocks: Vec<ScheduleBlock>) -> Result<Self, ValidationError> {
        if blocks.len() > MAX_BLOCKS {
            return Err(ValidationError::TooManyBlocks {
                max: MAX_BLOCKS,
                actual: blocks.len(),
            });
        }
        Ok(Self(blocks))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Blocks that cannot be parsed, with their position and the cause.
    pub fn malformed_blocks(&self) -> impl Iterator<Item = (usize, BlockError)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(index, block)| block.parse().err().map(|err| (index, err)))
    }

    /// Target temperature for `now`, or `None` when nothing matches.
    #[must_use]
    pub fn resolve(&self, now: NaiveTime) -> Option<f64> {
        resolve(&self.0, now)
    }
}

/// Resolve the target temperature of the first block containing `now`.
///
/// Overlapping blocks are allowed; list order decides. Malformed blocks
/// are skipped.
#[must_use]
pub fn resolve(blocks: &[ScheduleBlock], now: NaiveTime) -> Option<f64> {
    blocks
        .iter()
        .filter_map(|block| block.parse().ok())
        .find(|block| block.contains(now))
        .map(|block| block.temperature)
}
