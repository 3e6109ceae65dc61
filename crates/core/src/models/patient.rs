use serde::{Deserialize, Serialize};

use crate::models::dose_window::{DoseWindow, DoseWindowId};
use crate::models::health_metric::{HealthMetric, MetricSeries};

/// Onboarding and subscription state of a patient account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientState {
    Intro,
    DoseWindowsRequested,
    DoseWindowTimesRequested,
    TimezoneRequested,
    PaymentMethodRequested,
    Active,
    Paused,
    SubscriptionExpired,
    #[serde(other)]
    Unknown,
}

impl PatientState {
    /// Still answering the onboarding questions over SMS.
    pub fn is_onboarding(&self) -> bool {
        matches!(
            self,
            PatientState::Intro
                | PatientState::DoseWindowsRequested
                | PatientState::DoseWindowTimesRequested
                | PatientState::TimezoneRequested
        )
    }

    pub fn needs_payment(&self) -> bool {
        matches!(
            self,
            PatientState::PaymentMethodRequested | PatientState::SubscriptionExpired
        )
    }

    pub fn is_subscribed(&self) -> bool {
        matches!(self, PatientState::Active | PatientState::Paused)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryState {
    PaymentVerificationPending,
}

/// Everything the portal home screen loads for a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    pub patient_name: String,
    #[serde(default)]
    pub dose_windows: Vec<DoseWindow>,
    /// Medication history for the requested month, rendered by the calendar.
    #[serde(default)]
    pub event_data: serde_json::Value,
    #[serde(default)]
    pub health_metric_data: MetricSeries,
    #[serde(default)]
    pub tracked_health_metrics: Vec<HealthMetric>,
    pub state: PatientState,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub impersonating: Option<bool>,
}

impl PatientData {
    pub fn dose_window(&self, id: DoseWindowId) -> Option<&DoseWindow> {
        self.dose_windows.iter().find(|window| window.id == Some(id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientStateResponse {
    pub state: PatientState,
}
