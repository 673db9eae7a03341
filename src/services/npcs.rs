use crate::db::{CommitPolicy, PoolManager};
use crate::error::{AppError, AppResult};
use crate::models::NpcSeed;

use super::seeding::{distinct_keys, SeedOutcome, SeedRoutine};

pub const NPCS: &[NpcSeed] = &[
    NpcSeed {
        world: "main_street",
        slug: "rosa-mentor",
        name: "Rosa Delgado",
        role: "mentor",
        personality: "Patient, asks questions before giving answers.",
        industry: None,
        base_trust: 70,
    },
    NpcSeed {
        world: "main_street",
        slug: "gus-roaster",
        name: "Gus Okafor",
        role: "supplier",
        personality: "Generous with samples, strict about payment terms.",
        industry: Some("coffee_shop"),
        base_trust: 50,
    },
    NpcSeed {
        world: "main_street",
        slug: "ines-banker",
        name: "Ines Moreau",
        role: "banker",
        personality: "Wants to see the numbers before she sees the pitch.",
        industry: None,
        base_trust: 35,
    },
    NpcSeed {
        world: "main_street",
        slug: "theo-rival",
        name: "Theo Brandt",
        role: "competitor",
        personality: "Undercuts prices, then complains about margins.",
        industry: Some("coffee_shop"),
        base_trust: 20,
    },
    NpcSeed {
        world: "harbor_city",
        slug: "kai-accountant",
        name: "Kai Nakamura",
        role: "mentor",
        personality: "Explains everything with a spreadsheet open.",
        industry: Some("software_studio"),
        base_trust: 65,
    },
    NpcSeed {
        world: "harbor_city",
        slug: "dot-inspector",
        name: "Dorothy Hale",
        role: "regulator",
        personality: "By the book, but rewards a clean record.",
        industry: Some("food_truck"),
        base_trust: 40,
    },
    NpcSeed {
        world: "harbor_city",
        slug: "sam-investor",
        name: "Sam Adeyemi",
        role: "investor",
        personality: "Asks about growth, then about cash burn.",
        industry: None,
        base_trust: 45,
    },
];

/// Seeds NPCs for each world that has none yet
#[derive(Debug, Clone, Copy)]
pub struct NpcSeeder {
    npcs: &'static [NpcSeed],
}

impl NpcSeeder {
    pub fn new(npcs: &'static [NpcSeed]) -> Self {
        Self { npcs }
    }
}

impl Default for NpcSeeder {
    fn default() -> Self {
        Self::new(NPCS)
    }
}

#[async_trait::async_trait]
impl SeedRoutine for NpcSeeder {
    fn name(&self) -> &'static str {
        "npcs"
    }

    async fn seed(&self, db: &PoolManager) -> AppResult<SeedOutcome> {
        let npcs = self.npcs;

        db.with_scope(CommitPolicy::OnSuccess, |scope| async move {
            let worlds = distinct_keys(npcs.iter().map(|n| n.world));

            let mut inserted = 0;
            for world in worlds {
                if scope
                    .has_rows(sqlx::query("SELECT COUNT(*) FROM npcs WHERE world = $1").bind(world))
                    .await?
                {
                    continue;
                }

                for npc in npcs.iter().filter(|n| n.world == world) {
                    inserted += scope
                        .execute(
                            sqlx::query(
                                "INSERT INTO npcs \
                                 (world, slug, name, role, personality, industry, base_trust) \
                                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                            )
                            .bind(npc.world)
                            .bind(npc.slug)
                            .bind(npc.name)
                            .bind(npc.role)
                            .bind(npc.personality)
                            .bind(npc.industry)
                            .bind(npc.base_trust),
                        )
                        .await?;
                }
            }

            Ok::<_, AppError>(SeedOutcome::from_inserted(inserted))
        })
        .await
    }
}
