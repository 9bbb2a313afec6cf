use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::regions::models::{Region, RegionLevel};

/// Lifecycle of one region list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum LevelStatus {
    #[default]
    Empty,
    Loading,
    Populated,
    Failed,
}

/// Options, selection and fetch state of one region level
#[derive(Debug, Clone, Default)]
pub struct LevelState {
    pub status: LevelStatus,
    pub options: Vec<Region>,
    pub selected: Option<Region>,
    pub error: Option<String>,
    generation: u64,
}

impl LevelState {
    /// Drop options, selection and error, and retire any in-flight fetch
    fn reset(&mut self) {
        self.generation += 1;
        self.status = LevelStatus::Empty;
        self.options.clear();
        self.selected = None;
        self.error = None;
    }
}

/// Tag carried by an outbound list fetch.
///
/// A result is only applied while the level's generation still equals the
/// ticket's; any reset or newer fetch on that level makes the ticket stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub level: RegionLevel,
    pub parent_id: Option<String>,
    generation: u64,
}

/// The four region levels of the form, province first
#[derive(Debug, Clone, Default)]
pub struct RegionCascade {
    levels: [LevelState; 4],
}

impl RegionCascade {
    pub fn level(&self, level: RegionLevel) -> &LevelState {
        &self.levels[level.index()]
    }

    fn level_mut(&mut self, level: RegionLevel) -> &mut LevelState {
        &mut self.levels[level.index()]
    }

    pub fn options(&self, level: RegionLevel) -> &[Region] {
        &self.level(level).options
    }

    pub fn find_option(&self, level: RegionLevel, id: &str) -> Option<&Region> {
        self.level(level).options.iter().find(|r| r.id == id)
    }

    /// Put `level` into `Loading` for `parent_id` and hand out the ticket the
    /// result must present
    pub fn begin_fetch(&mut self, level: RegionLevel, parent_id: Option<String>) -> FetchTicket {
        let state = self.level_mut(level);
        state.reset();
        state.status = LevelStatus::Loading;

        FetchTicket {
            level,
            parent_id,
            generation: state.generation,
        }
    }

    /// Apply a finished fetch. Returns `false` when the ticket is stale and
    /// the result was discarded.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Region>, String>,
    ) -> bool {
        let state = self.level_mut(ticket.level);
        if state.generation != ticket.generation || state.status != LevelStatus::Loading {
            return false;
        }

        match result {
            Ok(options) => {
                state.options = options;
                state.status = LevelStatus::Populated;
            }
            Err(error) => {
                state.error = Some(error);
                state.status = LevelStatus::Failed;
            }
        }
        true
    }

    /// Clear `level` and every level under it
    pub fn reset_from(&mut self, level: RegionLevel) {
        self.level_mut(level).reset();
        for descendant in level.descendants() {
            self.level_mut(descendant).reset();
        }
    }

    pub fn set_selected(&mut self, level: RegionLevel, region: Option<Region>) {
        self.level_mut(level).selected = region;
    }
}
