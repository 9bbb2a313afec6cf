use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::attendance::models::{AttendanceRecord, LevelStatus};
use crate::features::attendance::services::FormSession;
use crate::features::regions::dtos::RegionResponseDto;
use crate::features::regions::models::RegionLevel;

/// Request DTO for updating the free-text identity fields.
/// Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIdentityDto {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub full_address: Option<String>,
    pub institution: Option<String>,
}

/// Request DTO for selecting a region option by id
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectRegionDto {
    /// Id of one of the level's current options
    pub id: String,
}

/// State of one region dropdown
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionControlDto {
    pub level: RegionLevel,
    pub label: String,
    /// False while the parent level has no value
    pub enabled: bool,
    pub status: LevelStatus,
    pub selected_id: Option<String>,
    pub selected_name: String,
    pub options: Vec<RegionResponseDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response DTO describing everything needed to render the form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormViewDto {
    pub id: Uuid,
    pub record: AttendanceRecord,
    /// Province, city, district, village, in that order
    pub controls: Vec<RegionControlDto>,
    pub submitting: bool,
    pub submit_enabled: bool,
    pub success_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FormSession> for FormViewDto {
    fn from(session: FormSession) -> Self {
        let state = &session.state;

        let controls = RegionLevel::ALL
            .into_iter()
            .map(|level| {
                let level_state = state.cascade.level(level);
                RegionControlDto {
                    level,
                    label: level.label().to_string(),
                    enabled: state.is_enabled(level),
                    status: level_state.status,
                    selected_id: level_state.selected.as_ref().map(|r| r.id.clone()),
                    selected_name: state.record.region_name(level).to_string(),
                    options: level_state
                        .options
                        .iter()
                        .cloned()
                        .map(Into::into)
                        .collect(),
                    error: level_state.error.clone(),
                }
            })
            .collect();

        Self {
            id: session.id,
            record: state.record.clone(),
            controls,
            submitting: state.is_submitting(),
            submit_enabled: !state.is_submitting(),
            success_visible: state.success_visible,
            alert: state.alert.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// Which button of the HTML form was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageAction {
    SelectProvince,
    SelectCity,
    SelectDistrict,
    SelectVillage,
    ReloadProvince,
    ReloadCity,
    ReloadDistrict,
    ReloadVillage,
    Submit,
    DismissSuccess,
    DismissAlert,
}

impl PageAction {
    /// Level a select/reload action refers to
    pub fn level(self) -> Option<RegionLevel> {
        match self {
            PageAction::SelectProvince | PageAction::ReloadProvince => Some(RegionLevel::Province),
            PageAction::SelectCity | PageAction::ReloadCity => Some(RegionLevel::City),
            PageAction::SelectDistrict | PageAction::ReloadDistrict => Some(RegionLevel::District),
            PageAction::SelectVillage | PageAction::ReloadVillage => Some(RegionLevel::Village),
            PageAction::Submit | PageAction::DismissSuccess | PageAction::DismissAlert => None,
        }
    }
}

/// Urlencoded body posted by the HTML form. Disabled controls are not
/// posted by browsers, so every field is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct PageActionForm {
    pub action: PageAction,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub full_address: Option<String>,
    pub institution: Option<String>,
    pub province_id: Option<String>,
    pub city_id: Option<String>,
    pub district_id: Option<String>,
    pub village_id: Option<String>,
}

impl PageActionForm {
    pub fn identity(&self) -> UpdateIdentityDto {
        UpdateIdentityDto {
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            full_address: self.full_address.clone(),
            institution: self.institution.clone(),
        }
    }

    /// Posted option id for `level`; empty means the placeholder option
    pub fn region_id(&self, level: RegionLevel) -> Option<&str> {
        let id = match level {
            RegionLevel::Province => &self.province_id,
            RegionLevel::City => &self.city_id,
            RegionLevel::District => &self.district_id,
            RegionLevel::Village => &self.village_id,
        };
        id.as_deref().filter(|id| !id.is_empty())
    }
}
