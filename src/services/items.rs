use crate::db::{CommitPolicy, PoolManager};
use crate::error::{AppError, AppResult};
use crate::models::ItemSeed;

use super::seeding::{distinct_keys, SeedOutcome, SeedRoutine};

pub const ITEMS: &[ItemSeed] = &[
    ItemSeed {
        category: "equipment",
        slug: "espresso-machine",
        name: "Two-Group Espresso Machine",
        description: "Doubles drink throughput during rush hours.",
        price_cents: 450_000,
        effect: r#"{"throughput_multiplier": 2.0}"#,
    },
    ItemSeed {
        category: "equipment",
        slug: "repair-stand",
        name: "Workshop Repair Stand",
        description: "Cuts average bike repair time by a quarter.",
        price_cents: 35_000,
        effect: r#"{"service_time_multiplier": 0.75}"#,
    },
    ItemSeed {
        category: "equipment",
        slug: "pos-terminal",
        name: "Point-of-Sale Terminal",
        description: "Accepts cards and records every sale to the ledger.",
        price_cents: 60_000,
        effect: r#"{"card_payments": true}"#,
    },
    ItemSeed {
        category: "marketing",
        slug: "flyer-pack",
        name: "Flyer Pack",
        description: "Five hundred flyers for the neighborhood.",
        price_cents: 8_000,
        effect: r#"{"awareness": 5}"#,
    },
    ItemSeed {
        category: "marketing",
        slug: "loyalty-cards",
        name: "Loyalty Cards",
        description: "Buy nine, get the tenth free.",
        price_cents: 4_500,
        effect: r#"{"retention": 8}"#,
    },
    ItemSeed {
        category: "upgrade",
        slug: "outdoor-seating",
        name: "Outdoor Seating",
        description: "More seats when the weather is good.",
        price_cents: 120_000,
        effect: r#"{"capacity": 12, "weather_sensitive": true}"#,
    },
    ItemSeed {
        category: "upgrade",
        slug: "accounting-software",
        name: "Accounting Software License",
        description: "Automates bank reconciliation at period close.",
        price_cents: 25_000,
        effect: r#"{"auto_reconcile": true}"#,
    },
];

/// Seeds items for each category that has none yet
#[derive(Debug, Clone, Copy)]
pub struct ItemSeeder {
    items: &'static [ItemSeed],
}

impl ItemSeeder {
    pub fn new(items: &'static [ItemSeed]) -> Self {
        Self { items }
    }
}

impl Default for ItemSeeder {
    fn default() -> Self {
        Self::new(ITEMS)
    }
}

#[async_trait::async_trait]
impl SeedRoutine for ItemSeeder {
    fn name(&self) -> &'static str {
        "items"
    }

    async fn seed(&self, db: &PoolManager) -> AppResult<SeedOutcome> {
        let items = self.items;

        db.with_scope(CommitPolicy::OnSuccess, |scope| async move {
            let categories = distinct_keys(items.iter().map(|i| i.category));

            let mut inserted = 0;
            for category in categories {
                if scope
                    .has_rows(
                        sqlx::query("SELECT COUNT(*) FROM items WHERE category = $1")
                            .bind(category),
                    )
                    .await?
                {
                    continue;
                }

                for item in items.iter().filter(|i| i.category == category) {
                    inserted += scope
                        .execute(
                            sqlx::query(
                                "INSERT INTO items \
                                 (category, slug, name, description, price_cents, effect) \
                                 VALUES ($1, $2, $3, $4, $5, $6::jsonb)",
                            )
                            .bind(item.category)
                            .bind(item.slug)
                            .bind(item.name)
                            .bind(item.description)
                            .bind(item.price_cents)
                            .bind(item.effect),
                        )
                        .await?;
                }
            }

            Ok::<_, AppError>(SeedOutcome::from_inserted(inserted))
        })
        .await
    }
}
