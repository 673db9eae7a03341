//! Static seed content shipped with the game.
//!
//! These types describe rows inserted by the seed routines. They borrow
//! `'static` data so the seed tables can live in constants.

use serde::Serialize;

/// A playable scenario, unique per world/industry/discipline and slug
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScenarioSeed {
    pub world: &'static str,
    pub industry: &'static str,
    pub discipline: &'static str,
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    /// 1 (introductory) to 5 (expert)
    pub difficulty: i16,
    pub starting_cash_cents: i64,
    pub duration_days: i32,
}

/// A sequence of modules teaching one discipline
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CurriculumTrack {
    pub slug: &'static str,
    pub discipline: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CurriculumModuleSeed {
    pub track_slug: &'static str,
    pub position: i16,
    pub title: &'static str,
    pub objective: &'static str,
}

/// A non-player character living in one world
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NpcSeed {
    pub world: &'static str,
    pub slug: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub personality: &'static str,
    pub industry: Option<&'static str>,
    /// Starting trust towards the player, 0 to 100
    pub base_trust: i16,
}

/// A purchasable item
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ItemSeed {
    pub category: &'static str,
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price_cents: i64,
    /// JSON object describing the item's gameplay modifiers
    pub effect: &'static str,
}
