use chrono::{Datelike, Utc};
use coherence_client::{ClientConfig, HttpPortalApi, PortalApi};
use coherence_core::validation::DoseWindowValidator;
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ClientConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let now = Utc::now();
    let validator = match config.timezone {
        Some(tz) => DoseWindowValidator::for_timezone(tz, now.date_naive()),
        None => DoseWindowValidator::utc(),
    };

    info!("Fetching patient data from {}", config.api_url);
    let api = HttpPortalApi::new(config)?;
    let patient = api
        .patient_data(now.month())
        .await
        .wrap_err("Failed to load patient data")?;
    info!(
        "{} ({:?}) has {} dose windows",
        patient.patient_name,
        patient.state,
        patient.dose_windows.len()
    );

    let (reports, rejected) = validator.report(&patient.dose_windows);
    for (window, err) in rejected {
        warn!("Skipping dose window {:?}: {}", window.id, err);
    }
    for report in reports {
        if report.conflicts.is_empty() {
            info!("{} to {}", report.span.start, report.span.end);
        } else {
            let ids: Vec<String> = report
                .conflicts
                .iter()
                .filter_map(|other| other.id.map(|id| id.to_string()))
                .collect();
            warn!(
                "{} to {} overlaps dose windows {}",
                report.span.start,
                report.span.end,
                ids.join(", ")
            );
        }
    }

    Ok(())
}
