use crate::db::{CommitPolicy, PoolManager};
use crate::error::{AppError, AppResult};
use crate::models::ScenarioSeed;

use super::seeding::{distinct_keys, SeedOutcome, SeedRoutine};

pub const SCENARIOS: &[ScenarioSeed] = &[
    ScenarioSeed {
        world: "main_street",
        industry: "coffee_shop",
        discipline: "accounting",
        slug: "first-month-books",
        title: "Your First Month of Books",
        summary: "Record a month of sales and supplier bills, then close the period.",
        difficulty: 1,
        starting_cash_cents: 1_000_000,
        duration_days: 30,
    },
    ScenarioSeed {
        world: "main_street",
        industry: "coffee_shop",
        discipline: "accounting",
        slug: "cash-crunch",
        title: "Cash Crunch",
        summary: "Rent is due before the espresso machine loan clears. Manage payables.",
        difficulty: 2,
        starting_cash_cents: 250_000,
        duration_days: 14,
    },
    ScenarioSeed {
        world: "main_street",
        industry: "coffee_shop",
        discipline: "marketing",
        slug: "grand-opening",
        title: "Grand Opening",
        summary: "Spend a fixed promotion budget to reach a target number of regulars.",
        difficulty: 1,
        starting_cash_cents: 800_000,
        duration_days: 21,
    },
    ScenarioSeed {
        world: "main_street",
        industry: "coffee_shop",
        discipline: "operations",
        slug: "morning-rush",
        title: "Morning Rush",
        summary: "Schedule baristas and stock beans so the 8am queue never stalls.",
        difficulty: 2,
        starting_cash_cents: 600_000,
        duration_days: 7,
    },
    ScenarioSeed {
        world: "main_street",
        industry: "bike_repair",
        discipline: "accounting",
        slug: "parts-inventory",
        title: "Counting the Parts Bin",
        summary: "Value spare-parts inventory and book cost of goods sold per repair.",
        difficulty: 2,
        starting_cash_cents: 500_000,
        duration_days: 30,
    },
    ScenarioSeed {
        world: "main_street",
        industry: "bike_repair",
        discipline: "operations",
        slug: "spring-tuneups",
        title: "Spring Tune-Ups",
        summary: "Demand triples in April. Decide whether to hire or extend hours.",
        difficulty: 3,
        starting_cash_cents: 700_000,
        duration_days: 30,
    },
    ScenarioSeed {
        world: "harbor_city",
        industry: "food_truck",
        discipline: "marketing",
        slug: "festival-season",
        title: "Festival Season",
        summary: "Pick which weekend festivals to attend and price the menu for each crowd.",
        difficulty: 3,
        starting_cash_cents: 1_200_000,
        duration_days: 60,
    },
    ScenarioSeed {
        world: "harbor_city",
        industry: "food_truck",
        discipline: "operations",
        slug: "permit-maze",
        title: "The Permit Maze",
        summary: "Route the truck around permit zones while keeping food costs in line.",
        difficulty: 2,
        starting_cash_cents: 900_000,
        duration_days: 30,
    },
    ScenarioSeed {
        world: "harbor_city",
        industry: "software_studio",
        discipline: "accounting",
        slug: "deferred-revenue",
        title: "Paid in Advance",
        summary: "A client prepays a year of support. Recognize revenue month by month.",
        difficulty: 4,
        starting_cash_cents: 2_000_000,
        duration_days: 90,
    },
    ScenarioSeed {
        world: "harbor_city",
        industry: "software_studio",
        discipline: "accounting",
        slug: "payroll-quarter",
        title: "Payroll Quarter",
        summary: "Run three months of payroll, accrue taxes, and reconcile at quarter end.",
        difficulty: 4,
        starting_cash_cents: 3_500_000,
        duration_days: 90,
    },
    ScenarioSeed {
        world: "harbor_city",
        industry: "software_studio",
        discipline: "marketing",
        slug: "launch-week",
        title: "Launch Week",
        summary: "Split a launch budget across channels and read the funnel each day.",
        difficulty: 3,
        starting_cash_cents: 1_500_000,
        duration_days: 7,
    },
    ScenarioSeed {
        world: "harbor_city",
        industry: "software_studio",
        discipline: "operations",
        slug: "outage-response",
        title: "Outage Response",
        summary: "A major customer is down. Allocate engineers between the fix and the roadmap.",
        difficulty: 5,
        starting_cash_cents: 2_500_000,
        duration_days: 5,
    },
];

/// Distinct (world, industry, discipline) keys in first-seen order
pub fn natural_keys(
    scenarios: &[ScenarioSeed],
) -> Vec<(&'static str, &'static str, &'static str)> {
    distinct_keys(
        scenarios
            .iter()
            .map(|s| (s.world, s.industry, s.discipline)),
    )
}

/// Seeds scenarios one natural key at a time
///
/// A world/industry/discipline group with any existing row is left alone,
/// so groups added in a later release still get seeded on old databases.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSeeder {
    scenarios: &'static [ScenarioSeed],
}

impl ScenarioSeeder {
    pub fn new(scenarios: &'static [ScenarioSeed]) -> Self {
        Self { scenarios }
    }
}

impl Default for ScenarioSeeder {
    fn default() -> Self {
        Self::new(SCENARIOS)
    }
}

#[async_trait::async_trait]
impl SeedRoutine for ScenarioSeeder {
    fn name(&self) -> &'static str {
        "scenarios"
    }

    async fn seed(&self, db: &PoolManager) -> AppResult<SeedOutcome> {
        let scenarios = self.scenarios;

        db.with_scope(CommitPolicy::OnSuccess, |scope| async move {
            let mut inserted = 0;

            for (world, industry, discipline) in natural_keys(scenarios) {
                let seeded = scope
                    .has_rows(
                        sqlx::query(
                            "SELECT COUNT(*) FROM scenarios \
                             WHERE world = $1 AND industry = $2 AND discipline = $3",
                        )
                        .bind(world)
                        .bind(industry)
                        .bind(discipline),
                    )
                    .await?;

                if seeded {
                    tracing::debug!(world, industry, discipline, "Scenarios already present");
                    continue;
                }

                for scenario in scenarios.iter().filter(|s| {
                    s.world == world && s.industry == industry && s.discipline == discipline
                }) {
                    inserted += scope
                        .execute(
                            sqlx::query(
                                "INSERT INTO scenarios \
                                 (world, industry, discipline, slug, title, summary, \
                                  difficulty, starting_cash_cents, duration_days) \
                                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                            )
                            .bind(scenario.world)
                            .bind(scenario.industry)
                            .bind(scenario.discipline)
                            .bind(scenario.slug)
                            .bind(scenario.title)
                            .bind(scenario.summary)
                            .bind(scenario.difficulty)
                            .bind(scenario.starting_cash_cents)
                            .bind(scenario.duration_days),
                        )
                        .await?;
                }
            }

            Ok::<_, AppError>(SeedOutcome::from_inserted(inserted))
        })
        .await
    }
}
