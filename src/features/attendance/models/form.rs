use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::attendance::models::cascade::{FetchTicket, RegionCascade};
use crate::features::attendance::models::record::AttendanceRecord;
use crate::features::regions::models::{Region, RegionLevel};
use crate::shared::constants::SUBMISSION_FAILED_ALERT;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
}

/// Rejections raised by form operations
#[derive(Debug, Error)]
pub enum FormError {
    #[error("{} belum dapat dipilih", .0.label())]
    ControlDisabled(RegionLevel),

    #[error("{} dengan id '{id}' tidak ada dalam pilihan", .level.label())]
    UnknownRegion { level: RegionLevel, id: String },

    #[error("{} induk belum dipilih", .0.label())]
    ParentNotSelected(RegionLevel),

    #[error("Pengiriman sedang berlangsung")]
    SubmissionInFlight,

    #[error("{0}")]
    Incomplete(#[from] validator::ValidationErrors),
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::SubmissionInFlight => AppError::Conflict(err.to_string()),
            FormError::Incomplete(errors) => errors.into(),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

/// Everything one person's form holds: the record, the region cascade and
/// the submission state
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub record: AttendanceRecord,
    pub cascade: RegionCascade,
    pub submission: SubmissionStatus,
    pub success_visible: bool,
    pub alert: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start fetching the province list
    pub fn load_provinces(&mut self) -> FetchTicket {
        self.invalidate_from(RegionLevel::Province);
        self.cascade.begin_fetch(RegionLevel::Province, None)
    }

    pub fn select_province(&mut self, id: &str, name: &str) -> FetchTicket {
        self.select_and_fetch(RegionLevel::Province, RegionLevel::City, id, name)
    }

    pub fn select_city(&mut self, id: &str, name: &str) -> FetchTicket {
        self.select_and_fetch(RegionLevel::City, RegionLevel::District, id, name)
    }

    pub fn select_district(&mut self, id: &str, name: &str) -> FetchTicket {
        self.select_and_fetch(RegionLevel::District, RegionLevel::Village, id, name)
    }

    /// Villages are leaves: pure local assignment
    pub fn select_village(&mut self, name: &str) {
        self.record.set_region_name(RegionLevel::Village, name);
        let selected = self
            .cascade
            .options(RegionLevel::Village)
            .iter()
            .find(|v| v.name == name)
            .cloned();
        self.cascade.set_selected(RegionLevel::Village, selected);
    }

    /// Select the option with `id` at `level`. Returns the ticket of the
    /// child list fetch, or `None` for a village.
    pub fn select_by_id(
        &mut self,
        level: RegionLevel,
        id: &str,
    ) -> Result<Option<FetchTicket>, FormError> {
        if !self.is_enabled(level) {
            return Err(FormError::ControlDisabled(level));
        }

        let region = self
            .cascade
            .find_option(level, id)
            .cloned()
            .ok_or_else(|| FormError::UnknownRegion {
                level,
                id: id.to_string(),
            })?;

        let ticket = match level {
            RegionLevel::Province => Some(self.select_province(&region.id, &region.name)),
            RegionLevel::City => Some(self.select_city(&region.id, &region.name)),
            RegionLevel::District => Some(self.select_district(&region.id, &region.name)),
            RegionLevel::Village => {
                self.select_village(&region.name);
                None
            }
        };
        Ok(ticket)
    }

    /// Re-fetch the list at `level` for the current parent selection.
    /// Clears `level` and everything below it first.
    pub fn reload(&mut self, level: RegionLevel) -> Result<FetchTicket, FormError> {
        let parent_id = match level.parent() {
            None => return Ok(self.load_provinces()),
            Some(parent) => self
                .cascade
                .level(parent)
                .selected
                .as_ref()
                .map(|r| r.id.clone())
                .ok_or(FormError::ParentNotSelected(level))?,
        };

        self.invalidate_from(level);
        Ok(self.cascade.begin_fetch(level, Some(parent_id)))
    }

    pub fn apply_fetch(&mut self, ticket: &FetchTicket, result: Result<Vec<Region>, String>) -> bool {
        self.cascade.complete_fetch(ticket, result)
    }

    /// A region control accepts input only once its parent has a value
    pub fn is_enabled(&self, level: RegionLevel) -> bool {
        match level.parent() {
            None => true,
            Some(parent) => !self.record.region_name(parent).is_empty(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submission == SubmissionStatus::Submitting
    }

    /// `Idle → Submitting`. Returns the record to send.
    pub fn begin_submit(&mut self) -> Result<AttendanceRecord, FormError> {
        if self.is_submitting() {
            return Err(FormError::SubmissionInFlight);
        }
        self.record.validate()?;

        self.submission = SubmissionStatus::Submitting;
        self.alert = None;
        Ok(self.record.clone())
    }

    /// `Submitting → Success | Idle-with-alert`
    pub fn finish_submit(&mut self, outcome: Result<(), String>) {
        self.submission = SubmissionStatus::Idle;

        match outcome {
            Ok(()) => {
                self.success_visible = true;
                self.record = AttendanceRecord::default();
                self.cascade.set_selected(RegionLevel::Province, None);
                self.invalidate_from(RegionLevel::City);
            }
            Err(_) => {
                self.alert = Some(SUBMISSION_FAILED_ALERT.to_string());
            }
        }
    }

    pub fn dismiss_success(&mut self) {
        self.success_visible = false;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    fn select_and_fetch(
        &mut self,
        level: RegionLevel,
        child: RegionLevel,
        id: &str,
        name: &str,
    ) -> FetchTicket {
        self.record.set_region_name(level, name);
        self.cascade.set_selected(level, Some(Region::new(id, name)));
        self.invalidate_from(child);
        self.cascade.begin_fetch(child, Some(id.to_string()))
    }

    /// The single invalidation rule: `level` and all levels below it lose
    /// their options, selection and record field
    fn invalidate_from(&mut self, level: RegionLevel) {
        self.record.set_region_name(level, "");
        for descendant in level.descendants() {
            self.record.set_region_name(descendant, "");
        }
        self.cascade.reset_from(level);
    }
}
