use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for region ids of the wilayah reference API.
    /// Ids are plain digit strings: 2 (province), 4 (regency),
    /// 7 (district) or 10 (village) digits.
    /// - Valid: "32", "3273", "3273010", "3273010001"
    /// - Invalid: "", "3", "32.73", "../32", "32a"
    pub static ref REGION_ID_REGEX: Regex = Regex::new(r"^[0-9]{2,10}$").unwrap();
}
