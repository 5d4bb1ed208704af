//! Section (offering) model.
//!
//! A section is one offered meeting pattern of a course: a set of weekdays
//! and a daily time range. Two sections conflict iff they share a weekday
//! AND their time ranges intersect.
//!
//! # Wire formats
//! - Time: `"HH:MM - HH:MM"`, 24-hour, space-hyphen-space separator.
//! - Days: hyphen-joined weekday names (`"Sunday-Tuesday-Thursday"`) or `"N/A"`.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

const NOT_APPLICABLE: &str = "N/A";

/// A daily time interval `[start, end)` in minutes after midnight.
///
/// Half-open: a class ending at 10:00 does not overlap one starting at 10:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    /// Start (minutes after midnight, inclusive).
    pub start_min: u16,
    /// End (minutes after midnight, exclusive).
    pub end_min: u16,
}

impl TimeRange {
    /// Creates a time range. Returns `None` unless `start < end <= 24:00`.
    pub fn new(start_min: u16, end_min: u16) -> Option<Self> {
        (start_min < end_min && end_min <= 24 * 60).then_some(Self { start_min, end_min })
    }

    /// Length in minutes.
    #[inline]
    pub fn duration_min(&self) -> u16 {
        self.end_min - self.start_min
    }

    /// Whether two ranges intersect.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }

    /// Idle minutes between two non-overlapping ranges (0 if they overlap).
    pub fn gap_to(&self, other: &Self) -> u16 {
        if self.end_min <= other.start_min {
            other.start_min - self.end_min
        } else if other.end_min <= self.start_min {
            self.start_min - other.end_min
        } else {
            0
        }
    }
}

fn parse_clock(raw: &str, whole: &str) -> Result<u16, InputError> {
    let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| InputError::TimeRange {
        value: whole.to_string(),
        reason: e.to_string(),
    })?;
    Ok((time.hour() * 60 + time.minute()) as u16)
}

impl FromStr for TimeRange {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once(" - ").ok_or_else(|| InputError::TimeRange {
            value: s.to_string(),
            reason: "expected 'HH:MM - HH:MM'".into(),
        })?;
        let start_min = parse_clock(start, s)?;
        let end_min = parse_clock(end, s)?;
        TimeRange::new(start_min, end_min).ok_or_else(|| InputError::TimeRange {
            value: s.to_string(),
            reason: "end must be after start".into(),
        })
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} - {:02}:{:02}",
            self.start_min / 60,
            self.start_min % 60,
            self.end_min / 60,
            self.end_min % 60
        )
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Weekdays a section meets on. Empty means `"N/A"` (no fixed meeting).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DayPattern {
    days: Vec<Weekday>,
}

impl DayPattern {
    /// Creates a pattern from weekdays. Duplicates are dropped.
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut out = Vec::new();
        for d in days {
            if !out.contains(&d) {
                out.push(d);
            }
        }
        Self { days: out }
    }

    /// The `"N/A"` pattern.
    pub fn not_applicable() -> Self {
        Self::default()
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Whether the two patterns meet on at least one common weekday.
    pub fn shares_day_with(&self, other: &Self) -> bool {
        self.days.iter().any(|d| other.days.contains(d))
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl FromStr for DayPattern {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_APPLICABLE) {
            return Ok(Self::not_applicable());
        }
        let mut days = Vec::new();
        for part in trimmed.split('-') {
            let day: Weekday = part.trim().parse().map_err(|_| InputError::DayPattern {
                value: s.to_string(),
            })?;
            if days.contains(&day) {
                return Err(InputError::DayPattern {
                    value: s.to_string(),
                });
            }
            days.push(day);
        }
        Ok(Self { days })
    }
}

impl fmt::Display for DayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days.is_empty() {
            return f.write_str(NOT_APPLICABLE);
        }
        let names: Vec<&str> = self.days.iter().map(|d| weekday_name(*d)).collect();
        f.write_str(&names.join("-"))
    }
}

impl Serialize for DayPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One offered section of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section label (e.g. `"1"`, `"B"`).
    #[serde(rename = "section")]
    pub label: String,
    /// Meeting days.
    #[serde(default)]
    pub days: DayPattern,
    /// Meeting time; `None` when the offering has no fixed time (`"N/A"`).
    #[serde(default, with = "optional_time")]
    pub time: Option<TimeRange>,
}

impl Section {
    /// Creates a section without a fixed meeting.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            days: DayPattern::not_applicable(),
            time: None,
        }
    }

    /// Sets the meeting days.
    pub fn with_days(mut self, days: DayPattern) -> Self {
        self.days = days;
        self
    }

    /// Sets the meeting time.
    pub fn with_time(mut self, time: TimeRange) -> Self {
        self.time = Some(time);
        self
    }

    /// Parses both wire strings at once. Intended for fixtures and hosts.
    pub fn parse(label: &str, days: &str, time: &str) -> Result<Self, InputError> {
        let time = if time.trim().eq_ignore_ascii_case(NOT_APPLICABLE) {
            None
        } else {
            Some(time.parse()?)
        };
        Ok(Self {
            label: label.to_string(),
            days: days.parse()?,
            time,
        })
    }

    /// Whether this section has a concrete weekly meeting.
    pub fn is_timed(&self) -> bool {
        !self.days.is_empty() && self.time.is_some()
    }

    /// Whether two sections overlap on a shared weekday.
    pub fn conflicts_with(&self, other: &Section) -> bool {
        match (&self.time, &other.time) {
            (Some(a), Some(b)) => self.days.shares_day_with(&other.days) && a.overlaps(b),
            _ => false,
        }
    }

    /// Smallest idle gap to `other` on a shared weekday, if they share one.
    pub fn gap_to(&self, other: &Section) -> Option<u16> {
        match (&self.time, &other.time) {
            (Some(a), Some(b)) if self.days.shares_day_with(&other.days) => Some(a.gap_to(b)),
            _ => None,
        }
    }
}

mod optional_time {
    use super::{TimeRange, NOT_APPLICABLE};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<TimeRange>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.collect_str(t),
            None => serializer.serialize_str(NOT_APPLICABLE),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<TimeRange>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case(NOT_APPLICABLE) => {
                Ok(None)
            }
            Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}
