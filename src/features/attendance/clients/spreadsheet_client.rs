use async_trait::async_trait;
use serde::Serialize;

use crate::core::config::SubmissionConfig;
use crate::core::error::{AppError, Result};
use crate::features::attendance::models::AttendanceRecord;
use crate::shared::constants::HTTP_USER_AGENT;

/// Destination of completed attendance records
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn submit(&self, record: &AttendanceRecord) -> Result<()>;
}

/// Row shape expected by the spreadsheet script
#[derive(Debug, Serialize)]
pub struct SpreadsheetRow<'a> {
    pub nama: &'a str,
    pub telepon: &'a str,
    pub alamat: &'a str,
    pub sekolah: &'a str,
    pub provinsi: &'a str,
    pub kota: &'a str,
    pub kecamatan: &'a str,
    pub kelurahan: &'a str,
}

impl<'a> From<&'a AttendanceRecord> for SpreadsheetRow<'a> {
    fn from(record: &'a AttendanceRecord) -> Self {
        Self {
            nama: &record.full_name,
            telepon: &record.phone,
            alamat: &record.full_address,
            sekolah: &record.institution,
            provinsi: &record.province_name,
            kota: &record.city_name,
            kecamatan: &record.district_name,
            kelurahan: &record.village_name,
        }
    }
}

/// Posts records to a Google Apps Script web app backed by a spreadsheet
pub struct SpreadsheetClient {
    client: reqwest::Client,
    url: String,
    check_status: bool,
}

impl SpreadsheetClient {
    pub fn new(config: &SubmissionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            check_status: config.check_status,
        })
    }
}

#[async_trait]
impl RecordSink for SpreadsheetClient {
    async fn submit(&self, record: &AttendanceRecord) -> Result<()> {
        let row = SpreadsheetRow::from(record);

        let response = self
            .client
            .post(&self.url)
            .json(&row)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Submission request failed: {}", e))
            })?;

        if !self.check_status {
            // Fire-and-forget: reaching the endpoint counts as delivered
            return Ok(());
        }

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Failed to read submission error body: {}", e);
                    String::new()
                }
            };
            return Err(AppError::ExternalServiceError(format!(
                "Submission endpoint returned HTTP {} - {}",
                status, body
            )));
        }

        tracing::debug!("Submission endpoint accepted record (HTTP {})", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::complete_record;

    #[test]
    fn test_row_uses_spreadsheet_keys() {
        let record = complete_record();
        let json = serde_json::to_value(SpreadsheetRow::from(&record)).unwrap();

        assert_eq!(json["nama"], record.full_name.as_str());
        assert_eq!(json["telepon"], record.phone.as_str());
        assert_eq!(json["alamat"], record.full_address.as_str());
        assert_eq!(json["sekolah"], record.institution.as_str());
        assert_eq!(json["provinsi"], "JAWA BARAT");
        assert_eq!(json["kota"], "KOTA BANDUNG");
        assert_eq!(json["kecamatan"], "SUKASARI");
        assert_eq!(json["kelurahan"], "SARIJADI");
        assert_eq!(json.as_object().unwrap().len(), 8);
    }
}
