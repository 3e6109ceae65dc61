use chrono::{TimeZone, Utc};
use coherence_core::models::{
    account::{LoginResponse, LoginStatus, PaymentData, PaymentMethod},
    dose_window::{DeleteDoseWindowRequest, DoseWindow, DoseWindowId, UpdateDoseWindowRequest},
    health_metric::{
        HealthMetric, MetricEvent, MetricValue, SetHealthMetricsRequest, group_metric_events,
    },
    patient::{PatientData, PatientState, SecondaryState},
};
use coherence_core::time::ClockTime;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_value};
use serde_test::{Token, assert_de_tokens, assert_tokens};

#[test]
fn test_dose_window_tokens() {
    let window = DoseWindow {
        id: Some(DoseWindowId(7)),
        start_hour: 8,
        start_minute: 15,
        end_hour: 9,
        end_minute: 45,
    };

    assert_tokens(
        &window,
        &[
            Token::Struct {
                name: "DoseWindow",
                len: 5,
            },
            Token::Str("id"),
            Token::Some,
            Token::I64(7),
            Token::Str("start_hour"),
            Token::U8(8),
            Token::Str("start_minute"),
            Token::U8(15),
            Token::Str("end_hour"),
            Token::U8(9),
            Token::Str("end_minute"),
            Token::U8(45),
            Token::StructEnd,
        ],
    );
}

#[test]
fn test_draft_dose_window() {
    let draft = DoseWindow::draft();

    assert!(!draft.is_persisted());
    assert_eq!(draft.start(), ClockTime::default());
    assert_eq!(draft.end(), ClockTime::default());
    assert_eq!(
        to_value(&draft).unwrap(),
        json!({"start_hour": 0, "start_minute": 0, "end_hour": 0, "end_minute": 0})
    );
}

#[test]
fn test_same_persisted_window() {
    let mut stored = DoseWindow::draft();
    stored.id = Some(DoseWindowId(3));
    let mut edited = stored.clone();
    edited.end_hour = 2;

    assert!(edited.same_persisted(&stored));
    assert!(!DoseWindow::draft().same_persisted(&DoseWindow::draft()));
    assert!(!DoseWindow::draft().same_persisted(&stored));
}

#[test]
fn test_dose_window_setters() {
    let mut window = DoseWindow::draft();
    window.set_start(ClockTime::new(21, 30).unwrap());
    window.set_end(ClockTime::new(23, 0).unwrap());

    assert_eq!((window.start_hour, window.start_minute), (21, 30));
    assert_eq!((window.end_hour, window.end_minute), (23, 0));
    assert!(window.check_fields().is_ok());
}

#[test]
fn test_dose_window_request_bodies() {
    let window = DoseWindow {
        id: Some(DoseWindowId(3)),
        start_hour: 14,
        start_minute: 0,
        end_hour: 15,
        end_minute: 0,
    };

    assert_eq!(
        to_value(UpdateDoseWindowRequest {
            updated_dose_window: window
        })
        .unwrap(),
        json!({"updatedDoseWindow": {
            "id": 3, "start_hour": 14, "start_minute": 0, "end_hour": 15, "end_minute": 0
        }})
    );
    assert_eq!(
        to_value(DeleteDoseWindowRequest {
            dose_window_id: DoseWindowId(3)
        })
        .unwrap(),
        json!({"doseWindowId": 3})
    );
}

#[test]
fn test_patient_data_deserialization() {
    let raw = r#"{
        "patientName": "Ada",
        "doseWindows": [
            {"id": 1, "start_hour": 8, "start_minute": 0, "end_hour": 9, "end_minute": 0, "day_of_week": 0},
            {"id": 2, "start_hour": 20, "start_minute": 30, "end_hour": 21, "end_minute": 30}
        ],
        "eventData": [{"event_type": "take"}],
        "healthMetricData": {
            "weight": [{"time": "Tue, 18 May 2021 15:00:00 GMT", "value": 150}],
            "blood pressure": [{"time": "Tue, 18 May 2021 16:00:00 GMT", "value": {"systolic": 120, "diastolic": 80}}]
        },
        "trackedHealthMetrics": ["weight", "blood pressure"],
        "state": "active"
    }"#;

    let patient: PatientData = from_str(raw).expect("Failed to deserialize patient data");

    assert_eq!(patient.patient_name, "Ada");
    assert_eq!(patient.dose_windows.len(), 2);
    assert_eq!(patient.state, PatientState::Active);
    assert_eq!(
        patient.dose_window(DoseWindowId(2)).map(|w| w.start_hour),
        Some(20)
    );
    assert!(patient.dose_window(DoseWindowId(9)).is_none());

    let weight = &patient.health_metric_data[&HealthMetric::Weight];
    assert_eq!(weight[0].value, MetricValue::Scalar(150));
    assert_eq!(
        weight[0].time,
        Utc.with_ymd_and_hms(2021, 5, 18, 15, 0, 0).unwrap()
    );
    assert_eq!(
        patient.health_metric_data[&HealthMetric::BloodPressure][0].value,
        MetricValue::BloodPressure {
            systolic: 120,
            diastolic: 80
        }
    );
}

#[rstest]
#[case("intro", PatientState::Intro)]
#[case("dose_windows_requested", PatientState::DoseWindowsRequested)]
#[case("dose_window_times_requested", PatientState::DoseWindowTimesRequested)]
#[case("timezone_requested", PatientState::TimezoneRequested)]
#[case("payment_method_requested", PatientState::PaymentMethodRequested)]
#[case("active", PatientState::Active)]
#[case("paused", PatientState::Paused)]
#[case("subscription_expired", PatientState::SubscriptionExpired)]
#[case("something_new", PatientState::Unknown)]
fn test_patient_state_names(#[case] name: &'static str, #[case] expected: PatientState) {
    assert_de_tokens(&expected, &[Token::UnitVariant { name: "PatientState", variant: name }]);
}

#[rstest]
#[case(PatientState::Intro, true, false, false)]
#[case(PatientState::TimezoneRequested, true, false, false)]
#[case(PatientState::PaymentMethodRequested, false, true, false)]
#[case(PatientState::SubscriptionExpired, false, true, false)]
#[case(PatientState::Active, false, false, true)]
#[case(PatientState::Paused, false, false, true)]
#[case(PatientState::Unknown, false, false, false)]
fn test_patient_state_groups(
    #[case] state: PatientState,
    #[case] onboarding: bool,
    #[case] needs_payment: bool,
    #[case] subscribed: bool,
) {
    assert_eq!(state.is_onboarding(), onboarding);
    assert_eq!(state.needs_payment(), needs_payment);
    assert_eq!(state.is_subscribed(), subscribed);
}

#[test]
fn test_payment_data_deserialization() {
    let raw = r#"{
        "state": "active",
        "secondary_state": "payment_verification_pending",
        "publishable_key": "pk_test",
        "subscription_end_date": "Fri, 18 Jun 2021 00:00:00 GMT",
        "payment_method": {"brand": "visa", "last4": "4242"}
    }"#;

    let payment: PaymentData = from_str(raw).expect("Failed to deserialize payment data");

    assert!(payment.verification_pending());
    assert_eq!(payment.secondary_state, Some(SecondaryState::PaymentVerificationPending));
    assert_eq!(
        payment.subscription_end_date,
        Some(Utc.with_ymd_and_hms(2021, 6, 18, 0, 0, 0).unwrap())
    );
    assert_eq!(
        payment.payment_method,
        Some(PaymentMethod {
            brand: "visa".to_string(),
            last4: "4242".to_string()
        })
    );
    assert!(payment.client_secret.is_none());

    let trial: PaymentData = from_str(r#"{"state": "payment_method_requested"}"#).unwrap();
    assert!(!trial.verification_pending());
    assert!(trial.subscription_end_date.is_none());
}

#[rstest]
#[case("phoneNumber", LoginStatus::PhoneNumber)]
#[case("2fa", LoginStatus::SecretCode)]
#[case("password", LoginStatus::Password)]
#[case("register", LoginStatus::Register)]
#[case("success", LoginStatus::Success)]
fn test_login_status(#[case] raw: &str, #[case] expected: LoginStatus) {
    let response: LoginResponse = from_str(&format!(r#"{{"status": "{raw}"}}"#)).unwrap();

    assert_eq!(response.status, expected);
    assert!(response.token.is_none());
}

#[rstest]
#[case(HealthMetric::BloodPressure, "120/80", MetricValue::BloodPressure { systolic: 120, diastolic: 80 })]
#[case(HealthMetric::BloodPressure, " 135 / 90 ", MetricValue::BloodPressure { systolic: 135, diastolic: 90 })]
#[case(HealthMetric::Weight, "182", MetricValue::Scalar(182))]
#[case(HealthMetric::Glucose, "95", MetricValue::Scalar(95))]
fn test_metric_value_parse(
    #[case] metric: HealthMetric,
    #[case] raw: &str,
    #[case] expected: MetricValue,
) {
    assert_eq!(MetricValue::parse(metric, raw).unwrap(), expected);
}

#[rstest]
#[case(HealthMetric::BloodPressure, "120")]
#[case(HealthMetric::BloodPressure, "high/low")]
#[case(HealthMetric::Weight, "heavy")]
fn test_metric_value_parse_rejects_garbage(#[case] metric: HealthMetric, #[case] raw: &str) {
    assert!(MetricValue::parse(metric, raw).is_err());
}

fn metric_event(event_type: &str, hour: u32, description: &str) -> MetricEvent {
    MetricEvent {
        event_type: event_type.to_string(),
        event_time: Utc.with_ymd_and_hms(2021, 5, 18, hour, 0, 0).unwrap(),
        description: description.to_string(),
    }
}

#[test]
fn test_group_metric_events() {
    let events = vec![
        metric_event("hm_weight", 8, "150"),
        metric_event("take", 9, "+15555550100"),
        metric_event("hm_blood pressure", 10, "120/80"),
        metric_event("hm_glucose", 11, "not tracked"),
        metric_event("hm_weight", 12, "149"),
    ];

    let series = group_metric_events(
        &events,
        &[HealthMetric::Weight, HealthMetric::BloodPressure],
    )
    .unwrap();

    assert_eq!(series.len(), 2);
    let weights: Vec<_> = series[&HealthMetric::Weight].iter().map(|r| r.value).collect();
    assert_eq!(weights, vec![MetricValue::Scalar(150), MetricValue::Scalar(149)]);
    assert_eq!(
        series[&HealthMetric::BloodPressure][0].time,
        Utc.with_ymd_and_hms(2021, 5, 18, 10, 0, 0).unwrap()
    );
    assert!(!series.contains_key(&HealthMetric::Glucose));
}

#[test]
fn test_group_metric_events_reports_bad_reading() {
    let events = vec![metric_event("hm_weight", 8, "a lot")];

    assert!(group_metric_events(&events, &[HealthMetric::Weight]).is_err());
}

#[test]
fn test_set_health_metrics_request() {
    let request = SetHealthMetricsRequest {
        metric_list: vec![HealthMetric::BloodPressure, HealthMetric::Glucose],
    };

    assert_eq!(
        to_value(&request).unwrap(),
        json!({"metricList": ["blood pressure", "glucose"]})
    );
    assert_eq!("weight".parse::<HealthMetric>().unwrap(), HealthMetric::Weight);
    assert!("height".parse::<HealthMetric>().is_err());
}
