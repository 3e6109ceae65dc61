//! # Time-of-day helpers
//!
//! Dose windows are stored as UTC hour/minute pairs and compared as local
//! wall-clock times. This module holds the local time-of-day representation
//! used for those comparisons, the UTC-to-local conversion, and the small
//! helpers the portal uses around timezones and the 12-hour time picker.
//!
//! No calendar date is reconstructed for comparisons: a [`LocalTime`] is
//! minutes since local midnight plus a flag telling whether the instant was
//! rolled onto the following day.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use serde::{Deserialize, Serialize};

use crate::errors::{CoherenceError, CoherenceResult};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Local instants strictly before this hour belong to the following day.
pub const ROLLOVER_HOUR: u8 = 4;

/// Minute values offered by the time picker.
pub const MINUTE_CHOICES: [u8; 4] = [0, 15, 30, 45];

/// Checks that an hour/minute pair is a valid 24-hour clock reading.
///
/// `field` names the pair in the error message (e.g. `"start"`).
pub fn check_clock(hour: u8, minute: u8, field: &str) -> CoherenceResult<()> {
    if hour > 23 {
        return Err(CoherenceError::Validation(format!(
            "{field} hour must be between 0 and 23, got {hour}"
        )));
    }
    if minute > 59 {
        return Err(CoherenceError::Validation(format!(
            "{field} minute must be between 0 and 59, got {minute}"
        )));
    }
    Ok(())
}

/// A local time of day on the rolled comparison timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalTime {
    minutes: u16,
    next_day: bool,
}

impl LocalTime {
    /// Builds a local time without applying the rollover rule.
    pub fn new(hour: u8, minute: u8) -> CoherenceResult<Self> {
        check_clock(hour, minute, "local")?;
        Ok(Self {
            minutes: u16::from(hour) * 60 + u16::from(minute),
            next_day: false,
        })
    }

    /// Builds a local time and moves it to the next day when its hour is
    /// before [`ROLLOVER_HOUR`].
    pub fn rolled(hour: u8, minute: u8) -> CoherenceResult<Self> {
        let mut time = Self::new(hour, minute)?;
        time.next_day = hour < ROLLOVER_HOUR;
        Ok(time)
    }

    /// Converts a stored UTC hour/minute to local time for `offset`, then
    /// applies the rollover rule.
    pub fn from_utc(hour: u8, minute: u8, offset: FixedOffset) -> CoherenceResult<Self> {
        check_clock(hour, minute, "utc")?;
        let utc_minutes = i32::from(hour) * 60 + i32::from(minute);
        let shift = offset.local_minus_utc() / 60;
        let local = (utc_minutes + shift).rem_euclid(MINUTES_PER_DAY as i32) as u32;
        Self::rolled((local / 60) as u8, (local % 60) as u8)
    }

    pub fn hour(&self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.minutes % 60) as u8
    }

    pub fn is_next_day(&self) -> bool {
        self.next_day
    }

    /// Minutes from the reference midnight, counting the rolled day.
    pub fn timeline_minutes(&self) -> u32 {
        u32::from(self.minutes) + if self.next_day { MINUTES_PER_DAY } else { 0 }
    }
}

impl Ord for LocalTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timeline_minutes().cmp(&other.timeline_minutes())
    }
}

impl PartialOrd for LocalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = ClockTime {
            hour: self.hour(),
            minute: self.minute(),
        };
        write!(f, "{clock}")?;
        if self.next_day {
            write!(f, " (+1 day)")?;
        }
        Ok(())
    }
}

/// UTC offset of `tz` on `date`, honouring daylight saving time.
pub fn offset_on(tz: Tz, date: NaiveDate) -> FixedOffset {
    tz.offset_from_utc_date(&date).fix()
}

/// Maps a standard (non-DST) UTC offset in minutes to one of the supported
/// US timezone names.
///
/// When `is_dst` is set, `offset_minutes` is the observed offset and is
/// shifted back one hour before matching.
pub fn standard_timezone(offset_minutes: i32, is_dst: bool) -> Option<&'static str> {
    let standard = if is_dst { offset_minutes - 60 } else { offset_minutes };
    match standard {
        -480 => Some("US/Pacific"),
        -420 => Some("US/Mountain"),
        -360 => Some("US/Central"),
        -300 => Some("US/Eastern"),
        _ => None,
    }
}

/// Supported timezone name for `tz` at the instant `at`.
pub fn standard_timezone_of(tz: Tz, at: DateTime<Utc>) -> Option<&'static str> {
    let offset = tz.offset_from_utc_datetime(&at.naive_utc());
    standard_timezone(offset.base_utc_offset().num_minutes() as i32, false)
}

/// Whole days from `now` until `target`, rounded down.
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (target - now).num_seconds().div_euclid(86_400)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => write!(f, "AM"),
            Meridiem::Pm => write!(f, "PM"),
        }
    }
}

/// A 24-hour wall-clock reading as edited through the 12-hour time picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> CoherenceResult<Self> {
        check_clock(hour, minute, "clock")?;
        Ok(Self { hour, minute })
    }

    /// Hour on the 12-hour dial (1 to 12).
    pub fn hour12(&self) -> u8 {
        match self.hour {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        }
    }

    pub fn meridiem(&self) -> Meridiem {
        if self.hour >= 12 { Meridiem::Pm } else { Meridiem::Am }
    }

    /// Picks a new dial hour, keeping the current meridiem.
    pub fn with_hour12(self, hour12: u8) -> CoherenceResult<Self> {
        if !(1..=12).contains(&hour12) {
            return Err(CoherenceError::Validation(format!(
                "dial hour must be between 1 and 12, got {hour12}"
            )));
        }
        let hour = match self.meridiem() {
            Meridiem::Am => hour12 % 12,
            Meridiem::Pm => hour12 % 12 + 12,
        };
        Ok(Self { hour, ..self })
    }

    /// Picks a minute from [`MINUTE_CHOICES`].
    pub fn with_minute(self, minute: u8) -> CoherenceResult<Self> {
        if !MINUTE_CHOICES.contains(&minute) {
            return Err(CoherenceError::Validation(format!(
                "minute must be one of 0, 15, 30 or 45, got {minute}"
            )));
        }
        Ok(Self { minute, ..self })
    }

    pub fn with_meridiem(self, meridiem: Meridiem) -> Self {
        let hour = match (meridiem, self.meridiem()) {
            (Meridiem::Am, Meridiem::Pm) => self.hour - 12,
            (Meridiem::Pm, Meridiem::Am) => self.hour + 12,
            _ => self.hour,
        };
        Self { hour, ..self }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02} {}", self.hour12(), self.minute, self.meridiem())
    }
}
