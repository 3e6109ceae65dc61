//! # Dose window validation
//!
//! Decides whether a dose window may be saved next to a patient's other
//! windows. Windows are compared as local times of day on a timeline where
//! anything before 4 AM belongs to the following day, so an evening window
//! ending after midnight stays contiguous.
//!
//! A candidate is rejected when it lasts less than [`MIN_WINDOW_MINUTES`] or
//! when either of its endpoints falls inside another window. Both ends of the
//! other window are inclusive: back-to-back windows count as overlapping.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use crate::errors::{CoherenceError, CoherenceResult};
use crate::models::dose_window::DoseWindow;
use crate::time::{LocalTime, offset_on};

/// Shortest window the reminder engine accepts.
pub const MIN_WINDOW_MINUTES: u32 = 30;

/// A dose window placed on the rolled local timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolledSpan {
    pub start: LocalTime,
    pub end: LocalTime,
}

impl RolledSpan {
    /// Inclusive on both ends.
    pub fn contains(&self, time: LocalTime) -> bool {
        self.start <= time && time <= self.end
    }

    /// Whether either end of `self` falls inside `other`.
    pub fn touches(&self, other: &RolledSpan) -> bool {
        other.contains(self.start) || other.contains(self.end)
    }

    /// Length in minutes; zero when the end precedes the start.
    pub fn duration_minutes(&self) -> u32 {
        self.end
            .timeline_minutes()
            .saturating_sub(self.start.timeline_minutes())
    }

    fn is_long_enough(&self) -> bool {
        self.end.timeline_minutes() >= self.start.timeline_minutes() + MIN_WINDOW_MINUTES
    }
}

/// One stored window, its rolled span and the windows it runs into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowReport<'a> {
    pub window: &'a DoseWindow,
    pub span: RolledSpan,
    pub conflicts: Vec<&'a DoseWindow>,
}

/// Validates dose windows stored in UTC against one local UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoseWindowValidator {
    offset: FixedOffset,
}

impl Default for DoseWindowValidator {
    fn default() -> Self {
        Self::utc()
    }
}

impl DoseWindowValidator {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Treats stored times as local times.
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Uses the offset `tz` observes on `date`.
    pub fn for_timezone(tz: Tz, date: NaiveDate) -> Self {
        Self::new(offset_on(tz, date))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local, rolled start and end of `window`.
    pub fn span(&self, window: &DoseWindow) -> CoherenceResult<RolledSpan> {
        window.check_fields()?;
        Ok(RolledSpan {
            start: LocalTime::from_utc(window.start_hour, window.start_minute, self.offset)?,
            end: LocalTime::from_utc(window.end_hour, window.end_minute, self.offset)?,
        })
    }

    /// Whether `candidate` may be saved alongside `existing`.
    ///
    /// No candidate is trivially valid. With no existing windows loaded only
    /// the minimum duration is checked. A persisted window is never compared
    /// with the existing window carrying its id; a draft is compared with
    /// every existing window.
    ///
    /// # Errors
    ///
    /// Returns [`CoherenceError::Validation`] when any hour or minute field is
    /// out of range, in the candidate or in `existing`.
    pub fn is_valid(
        &self,
        candidate: Option<&DoseWindow>,
        existing: &[DoseWindow],
    ) -> CoherenceResult<bool> {
        let Some(candidate) = candidate else {
            return Ok(true);
        };
        let span = self.span(candidate)?;
        let others = existing
            .iter()
            .map(|window| self.span(window).map(|s| (window, s)))
            .collect::<CoherenceResult<Vec<_>>>()?;

        if !span.is_long_enough() {
            return Ok(false);
        }

        let overlaps = others
            .iter()
            .any(|(window, other)| !candidate.same_persisted(window) && span.touches(other));
        Ok(!overlaps)
    }

    /// Existing windows that `candidate`'s endpoints fall into.
    pub fn conflicts<'a>(
        &self,
        candidate: &DoseWindow,
        existing: &'a [DoseWindow],
    ) -> CoherenceResult<Vec<&'a DoseWindow>> {
        let span = self.span(candidate)?;
        let mut conflicts = Vec::new();
        for window in existing.iter().filter(|w| !candidate.same_persisted(w)) {
            if span.touches(&self.span(window)?) {
                conflicts.push(window);
            }
        }
        Ok(conflicts)
    }

    /// Places each of `windows` on the timeline and lists the other windows
    /// its endpoints fall into.
    ///
    /// Windows with out-of-range fields are returned separately with their
    /// error and take no part in the comparison.
    pub fn report<'a>(
        &self,
        windows: &'a [DoseWindow],
    ) -> (Vec<WindowReport<'a>>, Vec<(&'a DoseWindow, CoherenceError)>) {
        let mut placed = Vec::new();
        let mut rejected = Vec::new();
        for window in windows {
            match self.span(window) {
                Ok(span) => placed.push((window, span)),
                Err(err) => rejected.push((window, err)),
            }
        }

        let reports = placed
            .iter()
            .enumerate()
            .map(|(i, &(window, span))| WindowReport {
                window,
                span,
                conflicts: placed
                    .iter()
                    .enumerate()
                    .filter(|&(j, &(other, other_span))| {
                        i != j && !window.same_persisted(other) && span.touches(&other_span)
                    })
                    .map(|(_, &(other, _))| other)
                    .collect(),
            })
            .collect();
        (reports, rejected)
    }

    /// [`is_valid`](Self::is_valid) over undecoded JSON.
    ///
    /// `candidate` may be `null`; `existing` must be an array.
    pub fn is_valid_json(&self, candidate: &Value, existing: &Value) -> CoherenceResult<bool> {
        let candidate: Option<DoseWindow> = serde_json::from_value(candidate.clone())?;
        if !existing.is_array() {
            return Err(CoherenceError::Validation(
                "existing dose windows must be an array".to_string(),
            ));
        }
        let existing: Vec<DoseWindow> = serde_json::from_value(existing.clone())?;
        self.is_valid(candidate.as_ref(), &existing)
    }
}

/// Validates with stored times taken as local times.
pub fn is_valid(candidate: Option<&DoseWindow>, existing: &[DoseWindow]) -> CoherenceResult<bool> {
    DoseWindowValidator::utc().is_valid(candidate, existing)
}
