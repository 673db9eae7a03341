pub mod accounting;
pub mod curriculum;
pub mod items;
pub mod npcs;
pub mod scenarios;
pub mod schema;
pub mod seeding;

pub use accounting::{initialize_player_accounting, player_balances};
pub use schema::{ensure_schema, SchemaReport};
pub use seeding::{default_routines, run_seeds, SeedOutcome, SeedReport, SeedRoutine};
