use serde::Serialize;

use crate::db::PoolManager;
use crate::error::AppResult;

use super::curriculum::CurriculumSeeder;
use super::items::ItemSeeder;
use super::npcs::NpcSeeder;
use super::scenarios::ScenarioSeeder;

/// What a seed routine did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "rows", rename_all = "snake_case")]
pub enum SeedOutcome {
    /// Rows were written
    Inserted(u64),
    /// Matching rows already existed, nothing was written
    Skipped,
}

impl SeedOutcome {
    pub fn from_inserted(rows: u64) -> Self {
        if rows == 0 {
            SeedOutcome::Skipped
        } else {
            SeedOutcome::Inserted(rows)
        }
    }

    pub fn rows(&self) -> u64 {
        match self {
            SeedOutcome::Inserted(rows) => *rows,
            SeedOutcome::Skipped => 0,
        }
    }
}

/// An idempotent bulk insert of static game content
///
/// Implementations check a natural key with `SELECT COUNT(*)` and insert
/// only what is missing, committing their own scope.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SeedRoutine: Send + Sync {
    /// Routine name for logging and reports
    fn name(&self) -> &'static str;

    async fn seed(&self, db: &PoolManager) -> AppResult<SeedOutcome>;
}

/// Outcome of every routine in a run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub outcomes: Vec<(&'static str, SeedOutcome)>,
}

impl SeedReport {
    pub fn total_inserted(&self) -> u64 {
        self.outcomes.iter().map(|(_, outcome)| outcome.rows()).sum()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == SeedOutcome::Skipped)
            .count()
    }
}

/// Distinct keys in first-seen order
///
/// Seed data does not have to be sorted by key for its groups to be found.
pub(crate) fn distinct_keys<T: PartialEq>(keys: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = Vec::new();
    for key in keys {
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen
}

/// The content routines run at startup, in dependency order
pub fn default_routines() -> Vec<Box<dyn SeedRoutine>> {
    vec![
        Box::new(ScenarioSeeder::default()),
        Box::new(CurriculumSeeder::default()),
        Box::new(NpcSeeder::default()),
        Box::new(ItemSeeder::default()),
    ]
}

/// Runs routines one after another
///
/// Each routine commits on its own. The first failure stops the run and is
/// returned; routines that already ran keep their rows.
pub async fn run_seeds(
    db: &PoolManager,
    routines: &[Box<dyn SeedRoutine>],
) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    for routine in routines {
        let outcome = match routine.seed(db).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(routine = routine.name(), error = %e, "Seed routine failed");
                return Err(e);
            }
        };

        match outcome {
            SeedOutcome::Inserted(rows) => {
                tracing::info!(routine = routine.name(), rows, "Seeded rows")
            }
            SeedOutcome::Skipped => {
                tracing::info!(routine = routine.name(), "Already seeded, skipping")
            }
        }
        report.outcomes.push((routine.name(), outcome));
    }

    Ok(report)
}
