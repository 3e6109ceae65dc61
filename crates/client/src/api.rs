//! # Portal API
//!
//! Thin wrappers around the Coherence backend endpoints the portal uses.
//! [`PortalApi`] is the seam the rest of the client talks to;
//! [`HttpPortalApi`] is the reqwest implementation.
//!
//! Every call is attempted once. A non-success status is reported as
//! [`CoherenceError::Api`] and never retried.

use async_trait::async_trait;
use coherence_core::{
    errors::{CoherenceError, CoherenceResult},
    models::{
        account::{
            LandingPageSignup, LoginRequest, LoginResponse, PaymentData, UpdatePasswordRequest,
            UpdateTimezoneRequest, UserProfile,
        },
        dose_window::{DeleteDoseWindowRequest, DoseWindow, DoseWindowId, UpdateDoseWindowRequest},
        health_metric::{HealthMetric, SetHealthMetricsRequest},
        patient::{PatientData, PatientStateResponse},
    },
};
use eyre::WrapErr;
use mockall::automock;
use reqwest::{Method, RequestBuilder, header::ACCEPT};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::ClientConfig;

/// Operations the portal performs against the backend.
#[automock]
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn login(&self, request: LoginRequest) -> CoherenceResult<LoginResponse>;

    /// Patient data with medication history for `calendar_month` (1 to 12).
    async fn patient_data(&self, calendar_month: u32) -> CoherenceResult<PatientData>;

    /// Same as [`patient_data`](Self::patient_data) for another patient, used
    /// by admin impersonation.
    async fn patient_data_for_number(
        &self,
        phone_number: String,
        calendar_month: u32,
    ) -> CoherenceResult<PatientData>;

    async fn payment_data(&self) -> CoherenceResult<PaymentData>;

    /// Creates the window when it has no id, updates it otherwise.
    async fn update_dose_window(&self, window: DoseWindow) -> CoherenceResult<()>;

    async fn delete_dose_window(&self, id: DoseWindowId) -> CoherenceResult<()>;

    async fn pause(&self) -> CoherenceResult<()>;

    async fn resume(&self) -> CoherenceResult<()>;

    async fn set_health_metrics(&self, metrics: Vec<HealthMetric>) -> CoherenceResult<()>;

    async fn submit_payment_info(&self) -> CoherenceResult<Value>;

    async fn cancel_subscription(&self) -> CoherenceResult<()>;

    async fn renew_subscription(&self) -> CoherenceResult<()>;

    async fn landing_page_signup(&self, signup: LandingPageSignup) -> CoherenceResult<()>;

    async fn patient_state(&self) -> CoherenceResult<PatientStateResponse>;

    async fn user_profile(&self) -> CoherenceResult<UserProfile>;

    async fn update_timezone(&self, timezone: String) -> CoherenceResult<()>;

    async fn update_password(&self, password: String) -> CoherenceResult<()>;
}

/// [`PortalApi`] over JSON and HTTPS.
#[derive(Debug, Clone)]
pub struct HttpPortalApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpPortalApi {
    pub fn new(config: ClientConfig) -> CoherenceResult<Self> {
        if !(config.api_url.starts_with("http://") || config.api_url.starts_with("https://")) {
            return Err(CoherenceError::Config(format!(
                "API URL must start with http:// or https://, got {:?}",
                config.api_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.config.route_url(route))
            .header(ACCEPT, "application/json");
        match &self.config.token {
            Some(token) => builder.basic_auth(token, Some("unused")),
            None => builder,
        }
    }

    async fn send<R: DeserializeOwned>(
        &self,
        method: Method,
        route: &str,
        builder: RequestBuilder,
    ) -> CoherenceResult<R> {
        debug!("{} /{}", method, route);
        let response = builder
            .send()
            .await
            .wrap_err_with(|| format!("{method} /{route} failed"))?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} call to /{} errored with status {}", method, route, status);
            return Err(CoherenceError::Api {
                route: route.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .wrap_err_with(|| format!("Failed to read response body of /{route}"))?;
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    async fn get<R: DeserializeOwned>(
        &self,
        route: &str,
        params: &[(&str, String)],
    ) -> CoherenceResult<R> {
        let builder = self.request(Method::GET, route).query(params);
        self.send(Method::GET, route, builder).await
    }

    async fn post<B, R>(&self, route: &str, payload: &B) -> CoherenceResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let builder = self.request(Method::POST, route).json(payload);
        self.send(Method::POST, route, builder).await
    }

    /// POST whose response body is not needed.
    async fn post_unit<B>(&self, route: &str, payload: &B) -> CoherenceResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.post::<B, Value>(route, payload).await.map(|_| ())
    }
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn login(&self, request: LoginRequest) -> CoherenceResult<LoginResponse> {
        self.post("login/new", &request).await
    }

    async fn patient_data(&self, calendar_month: u32) -> CoherenceResult<PatientData> {
        self.get(
            "patientData/new",
            &[("calendarMonth", calendar_month.to_string())],
        )
        .await
    }

    async fn patient_data_for_number(
        &self,
        phone_number: String,
        calendar_month: u32,
    ) -> CoherenceResult<PatientData> {
        self.get(
            "patientData/new",
            &[
                ("phoneNumber", phone_number),
                ("calendarMonth", calendar_month.to_string()),
            ],
        )
        .await
    }

    async fn payment_data(&self) -> CoherenceResult<PaymentData> {
        self.get("user/getPaymentData", &[]).await
    }

    async fn update_dose_window(&self, window: DoseWindow) -> CoherenceResult<()> {
        let request = UpdateDoseWindowRequest {
            updated_dose_window: window,
        };
        self.post_unit("doseWindow/update/new", &request).await
    }

    async fn delete_dose_window(&self, id: DoseWindowId) -> CoherenceResult<()> {
        let request = DeleteDoseWindowRequest { dose_window_id: id };
        self.post_unit("doseWindow/deactivate/new", &request).await
    }

    async fn pause(&self) -> CoherenceResult<()> {
        self.post_unit("user/pause/new", &json!({})).await
    }

    async fn resume(&self) -> CoherenceResult<()> {
        self.post_unit("user/resume/new", &json!({})).await
    }

    async fn set_health_metrics(&self, metrics: Vec<HealthMetric>) -> CoherenceResult<()> {
        let request = SetHealthMetricsRequest {
            metric_list: metrics,
        };
        self.post_unit("user/healthMetrics/set", &request).await
    }

    async fn submit_payment_info(&self) -> CoherenceResult<Value> {
        self.post("user/submitPaymentInfo", &json!({})).await
    }

    async fn cancel_subscription(&self) -> CoherenceResult<()> {
        self.post_unit("user/cancelSubscription", &json!({})).await
    }

    async fn renew_subscription(&self) -> CoherenceResult<()> {
        self.post_unit("user/renewSubscription", &json!({})).await
    }

    async fn landing_page_signup(&self, signup: LandingPageSignup) -> CoherenceResult<()> {
        self.post_unit("user/landingPageSignup", &signup).await
    }

    async fn patient_state(&self) -> CoherenceResult<PatientStateResponse> {
        self.get("patientState", &[]).await
    }

    async fn user_profile(&self) -> CoherenceResult<UserProfile> {
        self.get("user/profile", &[]).await
    }

    async fn update_timezone(&self, timezone: String) -> CoherenceResult<()> {
        self.post_unit("user/updateTimezone", &UpdateTimezoneRequest { timezone })
            .await
    }

    async fn update_password(&self, password: String) -> CoherenceResult<()> {
        self.post_unit("user/password", &UpdatePasswordRequest { password })
            .await
    }
}
