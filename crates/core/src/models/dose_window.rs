use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoherenceResult;
use crate::time::{ClockTime, check_clock};

/// Backend identifier of a persisted dose window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoseWindowId(pub i64);

impl fmt::Display for DoseWindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A daily recurring reminder interval, stored as UTC hour/minute pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DoseWindowId>,
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
}

impl DoseWindow {
    /// A window that has not been persisted yet, zeroed on both ends.
    pub fn draft() -> Self {
        Self {
            id: None,
            start_hour: 0,
            start_minute: 0,
            end_hour: 0,
            end_minute: 0,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether both are the same persisted window. Drafts match nothing.
    pub fn same_persisted(&self, other: &DoseWindow) -> bool {
        self.is_persisted() && self.id == other.id
    }

    pub fn start(&self) -> ClockTime {
        ClockTime {
            hour: self.start_hour,
            minute: self.start_minute,
        }
    }

    pub fn end(&self) -> ClockTime {
        ClockTime {
            hour: self.end_hour,
            minute: self.end_minute,
        }
    }

    pub fn set_start(&mut self, time: ClockTime) {
        self.start_hour = time.hour;
        self.start_minute = time.minute;
    }

    pub fn set_end(&mut self, time: ClockTime) {
        self.end_hour = time.hour;
        self.end_minute = time.minute;
    }

    /// Range-checks every hour and minute field.
    pub fn check_fields(&self) -> CoherenceResult<()> {
        check_clock(self.start_hour, self.start_minute, "start")?;
        check_clock(self.end_hour, self.end_minute, "end")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoseWindowRequest {
    pub updated_dose_window: DoseWindow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDoseWindowRequest {
    pub dose_window_id: DoseWindowId,
}
