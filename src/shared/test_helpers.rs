use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use fake::faker::address::en::StreetName;
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use tokio::sync::{oneshot, Notify};

use crate::core::error::{AppError, Result};
use crate::features::attendance::clients::RecordSink;
use crate::features::attendance::dtos::UpdateIdentityDto;
use crate::features::attendance::models::AttendanceRecord;
use crate::features::regions::clients::RegionSource;
use crate::features::regions::models::{Region, RegionLevel};

/// Small slice of the real wilayah tree, keyed by (level, parent id)
pub fn sample_regions(level: RegionLevel, parent_id: Option<&str>) -> Vec<Region> {
    let rows: &[(&str, &str)] = match (level, parent_id) {
        (RegionLevel::Province, None) => &[("32", "JAWA BARAT"), ("35", "JAWA TIMUR")],
        (RegionLevel::City, Some("32")) => &[
            ("3204", "KABUPATEN BANDUNG"),
            ("3273", "KOTA BANDUNG"),
        ],
        (RegionLevel::City, Some("35")) => &[("3578", "KOTA SURABAYA")],
        (RegionLevel::District, Some("3273")) => {
            &[("3273010", "SUKASARI"), ("3273020", "COBLONG")]
        }
        (RegionLevel::Village, Some("3273010")) => &[
            ("3273010001", "SARIJADI"),
            ("3273010002", "SUKARASA"),
        ],
        _ => &[],
    };

    rows.iter().map(|(id, name)| Region::new(*id, *name)).collect()
}

/// Identity fields filled with generated values
pub fn fake_identity() -> UpdateIdentityDto {
    UpdateIdentityDto {
        full_name: Some(Name().fake()),
        phone: Some(PhoneNumber().fake()),
        full_address: Some(StreetName().fake()),
        institution: Some(CompanyName().fake()),
    }
}

pub fn fill_identity(record: &mut AttendanceRecord) {
    record.full_name = Name().fake();
    record.phone = PhoneNumber().fake();
    record.full_address = StreetName().fake();
    record.institution = CompanyName().fake();
}

/// A record ready to submit, located in Sarijadi, Bandung
pub fn complete_record() -> AttendanceRecord {
    let mut record = AttendanceRecord {
        province_name: "JAWA BARAT".to_string(),
        city_name: "KOTA BANDUNG".to_string(),
        district_name: "SUKASARI".to_string(),
        village_name: "SARIJADI".to_string(),
        ..AttendanceRecord::default()
    };
    fill_identity(&mut record);
    record
}

/// In-memory [`RegionSource`] serving [`sample_regions`].
///
/// Fetches for a gated parent id block until the returned sender fires,
/// which lets tests hold a response in flight.
pub struct FakeRegionSource {
    data: HashMap<(RegionLevel, Option<String>), Vec<Region>>,
    failing: AtomicBool,
    calls: Mutex<Vec<(RegionLevel, Option<String>)>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    gated: Notify,
}

impl FakeRegionSource {
    pub fn indonesia() -> Self {
        let keys: [(RegionLevel, Option<&str>); 5] = [
            (RegionLevel::Province, None),
            (RegionLevel::City, Some("32")),
            (RegionLevel::City, Some("35")),
            (RegionLevel::District, Some("3273")),
            (RegionLevel::Village, Some("3273010")),
        ];

        let data = keys
            .into_iter()
            .map(|(level, parent)| {
                (
                    (level, parent.map(str::to_string)),
                    sample_regions(level, parent),
                )
            })
            .collect();

        Self {
            data,
            failing: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
            gated: Notify::new(),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold the next fetch for children of `parent_id` until the sender fires
    pub fn gate(&self, parent_id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(parent_id.to_string(), rx);
        tx
    }

    /// Resolves once a gated fetch is waiting
    pub async fn wait_gated(&self) {
        self.gated.notified().await;
    }

    pub fn calls(&self) -> Vec<(RegionLevel, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegionSource for FakeRegionSource {
    async fn list_regions(&self, level: RegionLevel, parent_id: Option<&str>) -> Result<Vec<Region>> {
        let key = (level, parent_id.map(str::to_string));
        self.calls.lock().unwrap().push(key.clone());

        let gate = parent_id.and_then(|id| self.gates.lock().unwrap().remove(id));
        if let Some(gate) = gate {
            self.gated.notify_one();
            let _ = gate.await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError(
                "Region API unavailable".to_string(),
            ));
        }

        self.data
            .get(&key)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No {} list for {:?}", level, parent_id)))
    }
}

/// In-memory [`RecordSink`] keeping every delivered record
#[derive(Default)]
pub struct FakeRecordSink {
    submitted: Mutex<Vec<AttendanceRecord>>,
    failing: AtomicBool,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    gated: Notify,
}

impl FakeRecordSink {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold the next submission until the sender fires
    pub fn gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub async fn wait_gated(&self) {
        self.gated.notified().await;
    }

    pub fn submitted(&self) -> Vec<AttendanceRecord> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for FakeRecordSink {
    async fn submit(&self, record: &AttendanceRecord) -> Result<()> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.gated.notify_one();
            let _ = gate.await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError(
                "Spreadsheet endpoint unreachable".to_string(),
            ));
        }

        self.submitted.lock().unwrap().push(record.clone());
        Ok(())
    }
}
