mod spreadsheet_client;

pub use spreadsheet_client::{RecordSink, SpreadsheetClient};
