use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::regions::models::RegionLevel;

/// The attendance record being entered. Every field is required before
/// submission; nothing beyond presence is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[validate(length(min = 1, message = "Nama lengkap wajib diisi"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "Nomor telepon wajib diisi"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Alamat lengkap wajib diisi"))]
    pub full_address: String,

    #[validate(length(min = 1, message = "Asal sekolah / instansi wajib diisi"))]
    pub institution: String,

    #[validate(length(min = 1, message = "Provinsi wajib dipilih"))]
    pub province_name: String,

    #[validate(length(min = 1, message = "Kota / kabupaten wajib dipilih"))]
    pub city_name: String,

    #[validate(length(min = 1, message = "Kecamatan wajib dipilih"))]
    pub district_name: String,

    #[validate(length(min = 1, message = "Kelurahan / desa wajib dipilih"))]
    pub village_name: String,
}

impl AttendanceRecord {
    pub fn region_name(&self, level: RegionLevel) -> &str {
        match level {
            RegionLevel::Province => &self.province_name,
            RegionLevel::City => &self.city_name,
            RegionLevel::District => &self.district_name,
            RegionLevel::Village => &self.village_name,
        }
    }

    pub fn set_region_name(&mut self, level: RegionLevel, name: impl Into<String>) {
        let slot = match level {
            RegionLevel::Province => &mut self.province_name,
            RegionLevel::City => &mut self.city_name,
            RegionLevel::District => &mut self.district_name,
            RegionLevel::Village => &mut self.village_name,
        };
        *slot = name.into();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::complete_record;

    #[test]
    fn test_empty_record_fails_every_field() {
        let errors = AttendanceRecord::default().validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 8);
    }

    #[test]
    fn test_complete_record_validates() {
        assert!(complete_record().validate().is_ok());
    }

    #[test]
    fn test_missing_village_is_reported() {
        let mut record = complete_record();
        record.set_region_name(RegionLevel::Village, "");

        let errors = record.validate().unwrap_err();
        let fields: Vec<_> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        assert_eq!(fields, vec!["village_name".to_string()]);
    }

    #[test]
    fn test_region_name_round_trips_per_level() {
        let mut record = AttendanceRecord::default();
        for level in RegionLevel::ALL {
            record.set_region_name(level, level.label());
        }
        for level in RegionLevel::ALL {
            assert_eq!(record.region_name(level), level.label());
        }
        assert!(!record.is_empty());
    }
}
