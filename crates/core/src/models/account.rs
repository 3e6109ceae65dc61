use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::http_date;
use crate::models::patient::{PatientState, SecondaryState};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone_number: String,
    #[serde(default)]
    pub secret_code: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Next step of the phone-number login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginStatus {
    #[serde(rename = "phoneNumber")]
    PhoneNumber,
    #[serde(rename = "2fa")]
    SecretCode,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "register")]
    Register,
    #[serde(rename = "success")]
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: LoginStatus,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub brand: String,
    pub last4: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentData {
    pub state: PatientState,
    #[serde(default)]
    pub secondary_state: Option<SecondaryState>,
    #[serde(default)]
    pub publishable_key: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default, with = "http_date::option")]
    pub subscription_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

impl PaymentData {
    pub fn verification_pending(&self) -> bool {
        self.secondary_state == Some(SecondaryState::PaymentVerificationPending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub timezone: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTimezoneRequest {
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPageSignup {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub trial_code: Option<String>,
}
