use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CoherenceError, CoherenceResult};
use crate::models::http_date;

/// Event types carrying a health metric reading start with this prefix.
pub const METRIC_EVENT_PREFIX: &str = "hm_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthMetric {
    #[serde(rename = "blood pressure")]
    BloodPressure,
    #[serde(rename = "weight")]
    Weight,
    #[serde(rename = "glucose")]
    Glucose,
}

impl HealthMetric {
    pub const ALL: [HealthMetric; 3] = [
        HealthMetric::BloodPressure,
        HealthMetric::Weight,
        HealthMetric::Glucose,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HealthMetric::BloodPressure => "blood pressure",
            HealthMetric::Weight => "weight",
            HealthMetric::Glucose => "glucose",
        }
    }
}

impl fmt::Display for HealthMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HealthMetric {
    type Err = CoherenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HealthMetric::ALL
            .into_iter()
            .find(|metric| metric.name() == s)
            .ok_or_else(|| CoherenceError::Validation(format!("unknown health metric: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    BloodPressure { systolic: u16, diastolic: u16 },
    Scalar(i64),
}

impl MetricValue {
    /// Parses the free-text description logged with a metric event.
    ///
    /// Blood pressure is logged as `systolic/diastolic`; every other metric
    /// is a plain integer.
    pub fn parse(metric: HealthMetric, raw: &str) -> CoherenceResult<Self> {
        let invalid = || CoherenceError::Validation(format!("invalid {metric} reading: {raw:?}"));
        match metric {
            HealthMetric::BloodPressure => {
                let (systolic, diastolic) = raw.trim().split_once('/').ok_or_else(invalid)?;
                Ok(MetricValue::BloodPressure {
                    systolic: systolic.trim().parse().map_err(|_| invalid())?,
                    diastolic: diastolic.trim().parse().map_err(|_| invalid())?,
                })
            }
            _ => raw
                .trim()
                .parse()
                .map(MetricValue::Scalar)
                .map_err(|_| invalid()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricReading {
    #[serde(with = "http_date")]
    pub time: DateTime<Utc>,
    pub value: MetricValue,
}

/// A raw event from the patient's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricEvent {
    pub event_type: String,
    #[serde(with = "http_date")]
    pub event_time: DateTime<Utc>,
    pub description: String,
}

impl MetricEvent {
    /// The metric this event records, if it is a metric event at all.
    pub fn metric(&self) -> Option<HealthMetric> {
        self.event_type
            .strip_prefix(METRIC_EVENT_PREFIX)
            .and_then(|name| name.parse().ok())
    }
}

pub type MetricSeries = BTreeMap<HealthMetric, Vec<MetricReading>>;

/// Groups metric events by metric, keeping only `tracked` metrics.
///
/// Readings keep the order of `events`. Events that are not metric events
/// are ignored; a tracked event with an unparseable description is an error.
pub fn group_metric_events(
    events: &[MetricEvent],
    tracked: &[HealthMetric],
) -> CoherenceResult<MetricSeries> {
    let mut series = MetricSeries::new();
    for event in events {
        let Some(metric) = event.metric().filter(|m| tracked.contains(m)) else {
            continue;
        };
        let value = MetricValue::parse(metric, &event.description)?;
        series.entry(metric).or_default().push(MetricReading {
            time: event.event_time,
            value,
        });
    }
    Ok(series)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetHealthMetricsRequest {
    pub metric_list: Vec<HealthMetric>,
}
