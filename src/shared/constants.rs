/// Blocking alert shown when the spreadsheet endpoint cannot be reached
pub const SUBMISSION_FAILED_ALERT: &str = "Terjadi kesalahan koneksi.";

/// Body of the success overlay
pub const SUBMISSION_SUCCESS_MESSAGE: &str = "Data absensi Anda telah kami terima.";

/// User agent sent to the region reference API and the spreadsheet endpoint
pub const HTTP_USER_AGENT: &str = "PresensiCore/1.0 (attendance-form)";
