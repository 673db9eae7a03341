use crate::db::{CommitPolicy, PoolManager};
use crate::error::{AppError, AppResult};
use crate::models::{CurriculumModuleSeed, CurriculumTrack};

use super::seeding::{distinct_keys, SeedOutcome, SeedRoutine};

pub const TRACKS: &[CurriculumTrack] = &[
    CurriculumTrack {
        slug: "bookkeeping-basics",
        discipline: "accounting",
        title: "Bookkeeping Basics",
        description: "Debits, credits and the accounting equation, one transaction at a time.",
    },
    CurriculumTrack {
        slug: "financial-statements",
        discipline: "accounting",
        title: "Reading Financial Statements",
        description: "Build an income statement and balance sheet from your own ledger.",
    },
    CurriculumTrack {
        slug: "finding-customers",
        discipline: "marketing",
        title: "Finding Customers",
        description: "Segments, positioning and the first promotion budget.",
    },
    CurriculumTrack {
        slug: "running-the-floor",
        discipline: "operations",
        title: "Running the Floor",
        description: "Capacity, scheduling and inventory for a small shop.",
    },
];

pub const MODULES: &[CurriculumModuleSeed] = &[
    CurriculumModuleSeed {
        track_slug: "bookkeeping-basics",
        position: 1,
        title: "The Accounting Equation",
        objective: "Explain why assets always equal liabilities plus equity.",
    },
    CurriculumModuleSeed {
        track_slug: "bookkeeping-basics",
        position: 2,
        title: "Debits and Credits",
        objective: "Record a cash sale and a credit purchase as balanced entries.",
    },
    CurriculumModuleSeed {
        track_slug: "bookkeeping-basics",
        position: 3,
        title: "The Trial Balance",
        objective: "Produce a trial balance and find a posting error.",
    },
    CurriculumModuleSeed {
        track_slug: "financial-statements",
        position: 1,
        title: "Income Statement",
        objective: "Compute gross margin and net income for one period.",
    },
    CurriculumModuleSeed {
        track_slug: "financial-statements",
        position: 2,
        title: "Balance Sheet",
        objective: "Close revenue and expense accounts into retained earnings.",
    },
    CurriculumModuleSeed {
        track_slug: "finding-customers",
        position: 1,
        title: "Who Buys Coffee at 7am",
        objective: "Describe two customer segments and what each values.",
    },
    CurriculumModuleSeed {
        track_slug: "finding-customers",
        position: 2,
        title: "Spending a Promotion Budget",
        objective: "Compare cost per new customer across two channels.",
    },
    CurriculumModuleSeed {
        track_slug: "running-the-floor",
        position: 1,
        title: "Bottlenecks",
        objective: "Identify the slowest station in a service line.",
    },
    CurriculumModuleSeed {
        track_slug: "running-the-floor",
        position: 2,
        title: "Reorder Points",
        objective: "Set a reorder point from daily usage and supplier lead time.",
    },
];

/// Distinct disciplines in first-seen order
fn disciplines(tracks: &[CurriculumTrack]) -> Vec<&'static str> {
    distinct_keys(tracks.iter().map(|t| t.discipline))
}

/// Seeds curriculum tracks and their modules, keyed by discipline
#[derive(Debug, Clone, Copy)]
pub struct CurriculumSeeder {
    tracks: &'static [CurriculumTrack],
    modules: &'static [CurriculumModuleSeed],
}

impl CurriculumSeeder {
    pub fn new(
        tracks: &'static [CurriculumTrack],
        modules: &'static [CurriculumModuleSeed],
    ) -> Self {
        Self { tracks, modules }
    }
}

impl Default for CurriculumSeeder {
    fn default() -> Self {
        Self::new(TRACKS, MODULES)
    }
}

#[async_trait::async_trait]
impl SeedRoutine for CurriculumSeeder {
    fn name(&self) -> &'static str {
        "curriculum"
    }

    async fn seed(&self, db: &PoolManager) -> AppResult<SeedOutcome> {
        let tracks = self.tracks;
        let modules = self.modules;

        db.with_scope(CommitPolicy::OnSuccess, |scope| async move {
            let mut inserted = 0;

            for discipline in disciplines(tracks) {
                let seeded = scope
                    .has_rows(
                        sqlx::query("SELECT COUNT(*) FROM curriculum_modules WHERE discipline = $1")
                            .bind(discipline),
                    )
                    .await?;

                if seeded {
                    tracing::debug!(discipline, "Curriculum already present");
                    continue;
                }

                for track in tracks.iter().filter(|t| t.discipline == discipline) {
                    inserted += scope
                        .execute(
                            sqlx::query(
                                "INSERT INTO curriculum_tracks (slug, discipline, title, description) \
                                 VALUES ($1, $2, $3, $4) ON CONFLICT (slug) DO NOTHING",
                            )
                            .bind(track.slug)
                            .bind(track.discipline)
                            .bind(track.title)
                            .bind(track.description),
                        )
                        .await?;

                    let track_id: i64 = scope
                        .fetch_one(
                            sqlx::query("SELECT id FROM curriculum_tracks WHERE slug = $1")
                                .bind(track.slug),
                        )
                        .await?
                        .get_as("id")?;

                    for module in modules.iter().filter(|m| m.track_slug == track.slug) {
                        inserted += scope
                            .execute(
                                sqlx::query(
                                    "INSERT INTO curriculum_modules \
                                     (track_id, discipline, position, title, objective) \
                                     VALUES ($1, $2, $3, $4, $5)",
                                )
                                .bind(track_id)
                                .bind(track.discipline)
                                .bind(module.position)
                                .bind(module.title)
                                .bind(module.objective),
                            )
                            .await?;
                    }
                }
            }

            Ok::<_, AppError>(SeedOutcome::from_inserted(inserted))
        })
        .await
    }
}
