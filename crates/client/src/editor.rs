//! # Dose Window Editor
//!
//! Client-side state behind the dose window editing dialog: the patient data
//! last fetched from the backend and the window currently being edited.
//!
//! Validation is recomputed on demand and never cached. Every mutation is
//! followed by a fresh patient data fetch, so the editor always shows what
//! the backend stored last.

use coherence_core::{
    errors::{CoherenceError, CoherenceResult},
    models::{
        dose_window::{DoseWindow, DoseWindowId},
        patient::PatientData,
    },
    time::ClockTime,
    validation::DoseWindowValidator,
};
use tracing::{debug, info};

use crate::api::PortalApi;

pub const SAVE_LABEL: &str = "Save dose window";
pub const INVALID_LABEL: &str = "Invalid dose window";

pub struct DoseWindowEditor<A> {
    api: A,
    validator: DoseWindowValidator,
    calendar_month: u32,
    patient: Option<PatientData>,
    editing: Option<DoseWindow>,
}

impl<A: PortalApi> DoseWindowEditor<A> {
    pub fn new(api: A, validator: DoseWindowValidator, calendar_month: u32) -> Self {
        Self {
            api,
            validator,
            calendar_month,
            patient: None,
            editing: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the patient data again, replacing what was loaded.
    pub async fn refresh(&mut self) -> CoherenceResult<&PatientData> {
        let patient = self.api.patient_data(self.calendar_month).await?;
        debug!(
            "Loaded {} dose windows for {}",
            patient.dose_windows.len(),
            patient.patient_name
        );
        let patient = self.patient.insert(patient);
        Ok(&*patient)
    }

    pub fn patient(&self) -> Option<&PatientData> {
        self.patient.as_ref()
    }

    /// Windows of the loaded patient; empty until the first fetch.
    pub fn existing(&self) -> &[DoseWindow] {
        self.patient
            .as_ref()
            .map(|patient| patient.dose_windows.as_slice())
            .unwrap_or_default()
    }

    pub fn editing(&self) -> Option<&DoseWindow> {
        self.editing.as_ref()
    }

    /// Starts editing a new, zeroed window.
    pub fn start_new(&mut self) {
        self.editing = Some(DoseWindow::draft());
    }

    /// Starts editing a copy of the persisted window `id`.
    pub fn edit(&mut self, id: DoseWindowId) -> CoherenceResult<()> {
        let window = self
            .patient
            .as_ref()
            .and_then(|patient| patient.dose_window(id))
            .ok_or_else(|| CoherenceError::NotFound(format!("Dose window {id} not found")))?;
        self.editing = Some(window.clone());
        Ok(())
    }

    pub fn set_start(&mut self, time: ClockTime) -> CoherenceResult<()> {
        self.editing_mut()?.set_start(time);
        Ok(())
    }

    pub fn set_end(&mut self, time: ClockTime) -> CoherenceResult<()> {
        self.editing_mut()?.set_end(time);
        Ok(())
    }

    /// Drops the window being edited without saving it.
    pub fn cancel(&mut self) {
        self.editing = None;
    }

    pub fn is_valid(&self) -> CoherenceResult<bool> {
        self.validator
            .is_valid(self.editing.as_ref(), self.existing())
    }

    /// Label of the save action; malformed input reads as invalid.
    pub fn save_label(&self) -> &'static str {
        match self.is_valid() {
            Ok(true) => SAVE_LABEL,
            _ => INVALID_LABEL,
        }
    }

    /// Submits the window being edited and reloads the patient data.
    ///
    /// # Errors
    ///
    /// [`CoherenceError::Validation`] when nothing is being edited or the
    /// window does not pass validation; no request is made in that case.
    pub async fn save(&mut self) -> CoherenceResult<&PatientData> {
        let window = self
            .editing
            .clone()
            .ok_or_else(|| CoherenceError::Validation("No dose window is being edited".into()))?;
        if !self.is_valid()? {
            return Err(CoherenceError::Validation(format!(
                "Dose window {} to {} overlaps another window or is too short",
                window.start(),
                window.end()
            )));
        }

        info!("Saving dose window {:?}", window.id);
        self.api.update_dose_window(window).await?;
        self.editing = None;
        self.refresh().await
    }

    /// Deactivates window `id` and reloads the patient data.
    pub async fn delete(&mut self, id: DoseWindowId) -> CoherenceResult<&PatientData> {
        info!("Deleting dose window {}", id);
        self.api.delete_dose_window(id).await?;
        if self.editing.as_ref().is_some_and(|window| window.id == Some(id)) {
            self.editing = None;
        }
        self.refresh().await
    }

    fn editing_mut(&mut self) -> CoherenceResult<&mut DoseWindow> {
        self.editing
            .as_mut()
            .ok_or_else(|| CoherenceError::Validation("No dose window is being edited".into()))
    }
}
