//! Time capability and the time types shipped with the crate.
//!
//! The store only needs a total order, a signed difference in seconds, text parsing
//! and epoch offsets. `SceneTime` is a signed nanosecond clock for scene-relative
//! data; `jiff::Timestamp` covers absolute ISO-8601 data.

use std::cmp::Ordering;
use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::SampledError;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Totally ordered timestamp usable as a sample key.
pub trait OrderedTime: Copy + fmt::Debug {
    /// Three-way comparison defining the sample order.
    fn compare(&self, other: &Self) -> Ordering;

    /// Signed seconds elapsed from `from` to `to` (`to - from`).
    fn seconds_between(from: &Self, to: &Self) -> f64;

    /// Parse a time from its textual form.
    fn parse_text(text: &str) -> Result<Self, SampledError>;

    /// Offset this time by a signed number of seconds.
    fn add_seconds(&self, seconds: f64) -> Result<Self, SampledError>;

    #[inline]
    fn time_eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

/// Moment on a scene clock, stored as signed nanoseconds from the scene origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct SceneTime(i64);

impl SceneTime {
    #[inline]
    pub fn from_nanos(nanoseconds: i64) -> Self {
        Self(nanoseconds)
    }

    /// Create a scene time from seconds, rejecting non-finite or out-of-range input.
    #[inline]
    pub fn from_seconds(seconds: f64) -> Result<Self, SampledError> {
        let nanos = seconds * NANOS_PER_SECOND;
        if !nanos.is_finite() || nanos.abs() >= i64::MAX as f64 {
            return Err(SampledError::TimeOverflow { seconds });
        }
        Ok(Self(nanos.round() as i64))
    }

    #[inline]
    pub fn zero() -> Self {
        Self(0)
    }

    #[inline]
    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / NANOS_PER_SECOND
    }

    #[inline]
    pub fn as_nanos(&self) -> i64 {
        self.0
    }
}

impl From<f64> for SceneTime {
    fn from(seconds: f64) -> Self {
        Self::from_seconds(seconds).unwrap_or(Self::zero())
    }
}

impl fmt::Display for SceneTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_seconds())
    }
}

impl OrderedTime for SceneTime {
    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }

    #[inline]
    fn seconds_between(from: &Self, to: &Self) -> f64 {
        (i128::from(to.0) - i128::from(from.0)) as f64 / NANOS_PER_SECOND
    }

    /// Accepts decimal seconds with an optional trailing `s`, e.g. `"12.5"` or `"12.5s"`.
    fn parse_text(text: &str) -> Result<Self, SampledError> {
        let trimmed = text.trim();
        let number = trimmed.strip_suffix('s').unwrap_or(trimmed);
        let seconds = number
            .parse::<f64>()
            .map_err(|err| SampledError::InvalidTime {
                text: text.to_string(),
                reason: err.to_string(),
            })?;
        Self::from_seconds(seconds)
    }

    fn add_seconds(&self, seconds: f64) -> Result<Self, SampledError> {
        let offset = Self::from_seconds(seconds)?;
        self.0
            .checked_add(offset.0)
            .map(Self)
            .ok_or(SampledError::TimeOverflow { seconds })
    }
}

impl OrderedTime for Timestamp {
    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline]
    fn seconds_between(from: &Self, to: &Self) -> f64 {
        to.duration_since(*from).as_secs_f64()
    }

    /// Accepts RFC 3339 / ISO-8601 instants such as `2012-08-04T10:00:00Z`.
    fn parse_text(text: &str) -> Result<Self, SampledError> {
        text.trim()
            .parse::<Timestamp>()
            .map_err(|err| SampledError::InvalidTime {
                text: text.to_string(),
                reason: err.to_string(),
            })
    }

    fn add_seconds(&self, seconds: f64) -> Result<Self, SampledError> {
        let duration = SignedDuration::try_from_secs_f64(seconds)
            .map_err(|_| SampledError::TimeOverflow { seconds })?;
        self.checked_add(duration)
            .map_err(|_| SampledError::TimeOverflow { seconds })
    }
}

/// Time slot of a packed sample tuple before it is resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeToken<T> {
    /// Already a time value
    Absolute(T),
    /// Text form, parsed with [`OrderedTime::parse_text`]
    Text(String),
    /// Seconds relative to the merge epoch
    Offset(f64),
}

impl<T: OrderedTime> TimeToken<T> {
    /// Resolve this token to a time. `index` is only used for error reporting.
    pub fn resolve(&self, epoch: Option<&T>, index: usize) -> Result<T, SampledError> {
        match self {
            Self::Absolute(time) => Ok(*time),
            Self::Text(text) => T::parse_text(text),
            Self::Offset(seconds) => epoch
                .ok_or(SampledError::MissingEpoch { index })?
                .add_seconds(*seconds),
        }
    }
}

/// One entry of an interleaved packed sample array.
///
/// Entries at tuple starts are read as times (a `Number` there is an epoch offset);
/// every other entry must be a `Number`.
#[derive(Debug, Clone, PartialEq)]
pub enum PackedEntry<T> {
    Time(T),
    Text(String),
    Number(f64),
}

impl<T> PackedEntry<T> {
    pub(crate) fn as_time_token(&self) -> TimeToken<T>
    where
        T: Copy,
    {
        match self {
            Self::Time(time) => TimeToken::Absolute(*time),
            Self::Text(text) => TimeToken::Text(text.clone()),
            Self::Number(seconds) => TimeToken::Offset(*seconds),
        }
    }

    pub(crate) fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl<T> From<f64> for PackedEntry<T> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<T> From<&str> for PackedEntry<T> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
