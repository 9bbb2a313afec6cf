use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::interval;
use uuid::Uuid;

use crate::core::config::FormConfig;
use crate::core::error::{AppError, Result};
use crate::features::attendance::clients::RecordSink;
use crate::features::attendance::dtos::UpdateIdentityDto;
use crate::features::attendance::models::{FetchTicket, FormState};
use crate::features::regions::clients::RegionSource;
use crate::features::regions::models::RegionLevel;

/// One visitor's form and its bookkeeping
#[derive(Debug, Clone)]
pub struct FormSession {
    pub id: Uuid,
    pub state: FormState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    last_seen: Instant,
}

impl FormSession {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            state: FormState::new(),
            created_at: now,
            updated_at: now,
            last_seen: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.last_seen = Instant::now();
    }
}

type SessionHandle = Arc<Mutex<FormSession>>;

/// Owns every live form session.
///
/// A session's mutex is never held across an outbound request: operations
/// take a [`FetchTicket`] under the lock, release it for the network call,
/// and re-lock to apply the result. Stale tickets are discarded.
pub struct FormService {
    regions: Arc<dyn RegionSource>,
    sink: Arc<dyn RecordSink>,
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    config: FormConfig,
}

impl FormService {
    pub fn new(
        regions: Arc<dyn RegionSource>,
        sink: Arc<dyn RecordSink>,
        config: FormConfig,
    ) -> Self {
        Self {
            regions,
            sink,
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Create a session and load its province list
    pub async fn create_session(&self) -> Result<FormSession> {
        let session = FormSession::new();
        let id = session.id;

        {
            let mut sessions = self.sessions.write().await;
            if sessions.len() >= self.config.max_sessions {
                tracing::warn!(
                    "Form session limit reached ({} active)",
                    self.config.max_sessions
                );
                return Err(AppError::RateLimitExceeded(
                    "Too many active forms, please try again later".to_string(),
                ));
            }
            sessions.insert(id, Arc::new(Mutex::new(session)));
        }
        tracing::info!("Form session created: id={}", id);

        self.load_provinces(id).await
    }

    pub async fn get_session(&self, id: Uuid) -> Result<FormSession> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        session.touch();
        Ok(session.clone())
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<()> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(not_found(id));
        }
        tracing::info!("Form session discarded: id={}", id);
        Ok(())
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// (Re)load the province list
    pub async fn load_provinces(&self, id: Uuid) -> Result<FormSession> {
        self.reload_level(id, RegionLevel::Province).await
    }

    pub async fn select_province(&self, id: Uuid, province_id: &str) -> Result<FormSession> {
        self.select(id, RegionLevel::Province, province_id).await
    }

    pub async fn select_city(&self, id: Uuid, city_id: &str) -> Result<FormSession> {
        self.select(id, RegionLevel::City, city_id).await
    }

    pub async fn select_district(&self, id: Uuid, district_id: &str) -> Result<FormSession> {
        self.select(id, RegionLevel::District, district_id).await
    }

    pub async fn select_village(&self, id: Uuid, village_id: &str) -> Result<FormSession> {
        self.select(id, RegionLevel::Village, village_id).await
    }

    /// Select the option `region_id` at `level`, then fetch the child list
    pub async fn select(
        &self,
        id: Uuid,
        level: RegionLevel,
        region_id: &str,
    ) -> Result<FormSession> {
        let handle = self.handle(id).await?;

        let ticket = {
            let mut session = handle.lock().await;
            session.touch();
            let ticket = session.state.select_by_id(level, region_id)?;
            tracing::debug!("Form {}: selected {} '{}'", id, level, region_id);
            match ticket {
                Some(ticket) => ticket,
                None => return Ok(session.clone()),
            }
        };

        self.fetch_and_apply(id, &handle, ticket).await
    }

    /// Manually re-fetch the list at `level` (e.g. after a failed fetch)
    pub async fn reload_level(&self, id: Uuid, level: RegionLevel) -> Result<FormSession> {
        let handle = self.handle(id).await?;

        let ticket = {
            let mut session = handle.lock().await;
            session.touch();
            session.state.reload(level)?
        };

        self.fetch_and_apply(id, &handle, ticket).await
    }

    /// Field-by-field update of the free-text identity fields
    pub async fn update_identity(
        &self,
        id: Uuid,
        dto: UpdateIdentityDto,
    ) -> Result<FormSession> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        session.touch();

        let record = &mut session.state.record;
        if let Some(full_name) = dto.full_name {
            record.full_name = full_name;
        }
        if let Some(phone) = dto.phone {
            record.phone = phone;
        }
        if let Some(full_address) = dto.full_address {
            record.full_address = full_address;
        }
        if let Some(institution) = dto.institution {
            record.institution = institution;
        }

        Ok(session.clone())
    }

    /// Send the record to the spreadsheet endpoint.
    ///
    /// A delivery failure is not an error of this call: it leaves the record
    /// untouched and raises the session's alert instead. Delivery and its
    /// bookkeeping run in their own task, so a dropped request still leaves
    /// the session `Idle`.
    pub async fn submit(&self, id: Uuid) -> Result<FormSession> {
        let handle = self.handle(id).await?;

        let record = {
            let mut session = handle.lock().await;
            session.touch();
            session.state.begin_submit()?
        };

        let sink = Arc::clone(&self.sink);
        let task_handle = Arc::clone(&handle);
        let delivery = tokio::spawn(async move {
            let outcome = sink.submit(&record).await;

            let mut session = task_handle.lock().await;
            session.touch();
            match &outcome {
                Ok(()) => tracing::info!("Form {}: attendance record submitted", id),
                Err(e) => tracing::warn!("Form {}: submission failed: {}", id, e),
            }
            session.state.finish_submit(outcome.map_err(|e| e.to_string()));
            session.clone()
        });

        match delivery.await {
            Ok(session) => Ok(session),
            Err(e) => {
                tracing::error!("Form {}: submission task aborted: {}", id, e);
                let mut session = handle.lock().await;
                session.state.finish_submit(Err(e.to_string()));
                Err(AppError::Internal(format!("Submission task failed: {}", e)))
            }
        }
    }

    pub async fn dismiss_success(&self, id: Uuid) -> Result<FormSession> {
        self.update(id, FormState::dismiss_success).await
    }

    pub async fn dismiss_alert(&self, id: Uuid) -> Result<FormSession> {
        self.update(id, FormState::dismiss_alert).await
    }

    /// Drop sessions idle for longer than the configured TTL. Sessions that
    /// are currently locked are in use and kept.
    pub async fn evict_idle(&self) -> usize {
        let ttl = self.config.session_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.last_seen.elapsed() < ttl,
            Err(_) => true,
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(
                "Evicted {} idle form sessions ({} remaining)",
                evicted,
                sessions.len()
            );
        }
        evicted
    }

    /// Background loop evicting idle sessions
    pub async fn run_sweeper(self: Arc<Self>) {
        tracing::info!(
            "Starting form session sweeper (ttl={}s, interval={}s)",
            self.config.session_ttl.as_secs(),
            self.config.sweep_interval.as_secs()
        );

        let mut ticker = interval(self.config.sweep_interval);
        loop {
            ticker.tick().await;
            self.evict_idle().await;
        }
    }

    async fn handle(&self, id: Uuid) -> Result<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn update(&self, id: Uuid, apply: impl FnOnce(&mut FormState)) -> Result<FormSession> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        session.touch();
        apply(&mut session.state);
        Ok(session.clone())
    }

    /// Fetch the list named by `ticket` and apply it. Runs in its own task
    /// so the level never stays `Loading` when the caller goes away.
    async fn fetch_and_apply(
        &self,
        id: Uuid,
        handle: &SessionHandle,
        ticket: FetchTicket,
    ) -> Result<FormSession> {
        let regions = Arc::clone(&self.regions);
        let task_handle = Arc::clone(handle);
        let task_ticket = ticket.clone();

        let fetch = tokio::spawn(async move {
            let ticket = task_ticket;
            let result = regions
                .list_regions(ticket.level, ticket.parent_id.as_deref())
                .await;

            if let Err(e) = &result {
                tracing::warn!("Form {}: failed to load {} list: {}", id, ticket.level, e);
            }

            let mut session = task_handle.lock().await;
            if !session
                .state
                .apply_fetch(&ticket, result.map_err(|e| e.to_string()))
            {
                tracing::debug!(
                    "Form {}: discarded stale {} list for parent {:?}",
                    id,
                    ticket.level,
                    ticket.parent_id
                );
            }
            session.clone()
        });

        match fetch.await {
            Ok(session) => Ok(session),
            Err(e) => {
                tracing::error!("Form {}: {} list task aborted: {}", id, ticket.level, e);
                let mut session = handle.lock().await;
                session.state.apply_fetch(&ticket, Err(e.to_string()));
                Err(AppError::Internal(format!("Region list task failed: {}", e)))
            }
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Form '{}' not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::attendance::models::LevelStatus;
    use crate::shared::test_helpers::{
        fake_identity, sample_regions, FakeRecordSink, FakeRegionSource,
    };
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    type Harness = (Arc<FormService>, Arc<FakeRegionSource>, Arc<FakeRecordSink>);

    fn service_with(source: FakeRegionSource, sink: FakeRecordSink) -> Harness {
        let source = Arc::new(source);
        let sink = Arc::new(sink);
        let service = Arc::new(FormService::new(
            source.clone(),
            sink.clone(),
            FormConfig::default(),
        ));
        (service, source, sink)
    }

    fn harness() -> Harness {
        service_with(FakeRegionSource::indonesia(), FakeRecordSink::default())
    }

    async fn filled_session(service: &FormService) -> Uuid {
        let id = service.create_session().await.unwrap().id;
        service.select_province(id, "32").await.unwrap();
        service.select_city(id, "3273").await.unwrap();
        service.select_district(id, "3273010").await.unwrap();
        service.select_village(id, "3273010001").await.unwrap();
        service.update_identity(id, fake_identity()).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_create_session_loads_provinces() {
        let (service, source, _) = harness();

        let session = service.create_session().await.unwrap();

        let provinces = session.state.cascade.level(RegionLevel::Province);
        assert_eq!(provinces.status, LevelStatus::Populated);
        assert_eq!(provinces.options, sample_regions(RegionLevel::Province, None));
        assert_eq!(source.calls(), vec![(RegionLevel::Province, None)]);
        assert_eq!(service.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_province_fetch_failure_is_visible_and_reloadable() {
        let (service, source, _) = harness();
        source.set_failing(true);

        let session = service.create_session().await.unwrap();
        let provinces = session.state.cascade.level(RegionLevel::Province);
        assert_eq!(provinces.status, LevelStatus::Failed);
        assert!(provinces.error.is_some());

        source.set_failing(false);
        let session = service.load_provinces(session.id).await.unwrap();
        assert_eq!(
            session.state.cascade.level(RegionLevel::Province).status,
            LevelStatus::Populated
        );
    }

    #[tokio::test]
    async fn test_each_selection_issues_one_fetch() {
        let (service, source, _) = harness();

        filled_session(&service).await;

        assert_eq!(
            source.calls(),
            vec![
                (RegionLevel::Province, None),
                (RegionLevel::City, Some("32".to_string())),
                (RegionLevel::District, Some("3273".to_string())),
                (RegionLevel::Village, Some("3273010".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_slow_city_list_of_previous_province_is_discarded() {
        let (service, source, _) = harness();
        let id = service.create_session().await.unwrap().id;

        let release_32 = source.gate("32");
        let first = tokio::spawn({
            let service = service.clone();
            async move { service.select_province(id, "32").await }
        });
        source.wait_gated().await;

        let session = service.select_province(id, "35").await.unwrap();
        assert_eq!(session.state.record.province_name, "JAWA TIMUR");

        release_32.send(()).unwrap();
        assert_ok!(first.await.unwrap());

        let session = service.get_session(id).await.unwrap();
        assert_eq!(session.state.record.province_name, "JAWA TIMUR");
        assert_eq!(
            session.state.cascade.options(RegionLevel::City),
            sample_regions(RegionLevel::City, Some("35")).as_slice()
        );
    }

    #[tokio::test]
    async fn test_successful_submit_resets_form() {
        let (service, _, sink) = harness();
        let id = filled_session(&service).await;

        let session = service.submit(id).await.unwrap();

        assert!(session.state.success_visible);
        assert!(session.state.record.is_empty());
        assert!(session.state.cascade.options(RegionLevel::City).is_empty());
        assert!(!session.state.cascade.options(RegionLevel::Province).is_empty());

        let submitted = sink.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].village_name, "SARIJADI");

        let session = service.dismiss_success(id).await.unwrap();
        assert!(!session.state.success_visible);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_record_and_alerts() {
        let (service, _, sink) = harness();
        let id = filled_session(&service).await;
        let before = service.get_session(id).await.unwrap().state.record;
        sink.set_failing(true);

        let session = service.submit(id).await.unwrap();

        assert_eq!(session.state.record, before);
        assert!(!session.state.is_submitting());
        assert!(session.state.alert.is_some());
        assert!(!session.state.success_visible);
    }

    #[tokio::test]
    async fn test_incomplete_submit_is_rejected() {
        let (service, _, sink) = harness();
        let id = service.create_session().await.unwrap().id;

        let err = assert_err!(service.submit(id).await);
        assert!(matches!(err, AppError::Validation(_)));
        assert!(sink.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_double_submit_conflicts_while_in_flight() {
        let sink = FakeRecordSink::default();
        let release = sink.gate();
        let (service, _, sink) = service_with(FakeRegionSource::indonesia(), sink);
        let id = filled_session(&service).await;

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.submit(id).await }
        });
        sink.wait_gated().await;

        let in_flight = service.get_session(id).await.unwrap();
        assert!(in_flight.state.is_submitting());
        let err = assert_err!(service.submit(id).await);
        assert!(matches!(err, AppError::Conflict(_)));

        release.send(()).unwrap();
        let session = first.await.unwrap().unwrap();
        assert!(session.state.success_visible);
        assert_eq!(sink.submitted().len(), 1);
    }

    /// Poll until `done` holds for the session, for work finishing in a
    /// background task
    async fn wait_for(service: &FormService, id: Uuid, done: impl Fn(&FormSession) -> bool) {
        for _ in 0..200 {
            if done(&service.get_session(id).await.unwrap()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("form {} never settled", id);
    }

    #[tokio::test]
    async fn test_dropped_submit_request_still_clears_submitting() {
        let sink = FakeRecordSink::default();
        let release = sink.gate();
        let (service, _, sink) = service_with(FakeRegionSource::indonesia(), sink);
        let id = filled_session(&service).await;

        let request = tokio::spawn({
            let service = service.clone();
            async move { service.submit(id).await }
        });
        sink.wait_gated().await;
        request.abort();
        assert!(request.await.unwrap_err().is_cancelled());

        release.send(()).unwrap();
        wait_for(&service, id, |s| !s.state.is_submitting()).await;

        let session = service.get_session(id).await.unwrap();
        assert!(session.state.success_visible);
        assert_eq!(sink.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_select_request_still_populates_child_list() {
        let (service, source, _) = harness();
        let id = service.create_session().await.unwrap().id;

        let release_32 = source.gate("32");
        let request = tokio::spawn({
            let service = service.clone();
            async move { service.select_province(id, "32").await }
        });
        source.wait_gated().await;
        request.abort();
        assert!(request.await.unwrap_err().is_cancelled());

        release_32.send(()).unwrap();
        wait_for(&service, id, |s| {
            s.state.cascade.level(RegionLevel::City).status != LevelStatus::Loading
        })
        .await;

        let session = service.get_session(id).await.unwrap();
        assert_eq!(
            session.state.cascade.options(RegionLevel::City),
            sample_regions(RegionLevel::City, Some("32")).as_slice()
        );
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (service, _, _) = harness();

        let err = assert_err!(service.get_session(Uuid::now_v7()).await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_session_limit() {
        let source = Arc::new(FakeRegionSource::indonesia());
        let service = FormService::new(
            source,
            Arc::new(FakeRecordSink::default()),
            FormConfig {
                max_sessions: 1,
                ..FormConfig::default()
            },
        );

        assert_ok!(service.create_session().await);
        let err = assert_err!(service.create_session().await);
        assert!(matches!(err, AppError::RateLimitExceeded(_)));
    }

    #[tokio::test]
    async fn test_evict_idle_sessions() {
        let service = FormService::new(
            Arc::new(FakeRegionSource::indonesia()),
            Arc::new(FakeRecordSink::default()),
            FormConfig {
                session_ttl: Duration::ZERO,
                ..FormConfig::default()
            },
        );
        let id = service.create_session().await.unwrap().id;

        assert_eq!(service.evict_idle().await, 1);
        assert!(service.get_session(id).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (service, _, _) = harness();
        let id = service.create_session().await.unwrap().id;

        assert_ok!(service.delete_session(id).await);
        assert_err!(service.delete_session(id).await);
    }
}
