pub mod accounting;
pub mod content;
pub mod record;

pub use accounting::{AccountBalance, AccountTemplate, AccountType, NormalBalance};
pub use content::{CurriculumModuleSeed, CurriculumTrack, ItemSeed, NpcSeed, ScenarioSeed};
pub use record::Record;
