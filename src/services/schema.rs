use crate::db::{CommitPolicy, PoolManager};
use crate::error::AppResult;

/// DDL for one table
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub ddl: &'static str,
}

/// Tables in dependency order; every statement is safe to re-run
pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "player_profiles",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS player_profiles (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            display_name TEXT,
            world TEXT NOT NULL DEFAULT 'main_street',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    },
    TableDef {
        name: "scenarios",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS scenarios (
            id BIGSERIAL PRIMARY KEY,
            world TEXT NOT NULL,
            industry TEXT NOT NULL,
            discipline TEXT NOT NULL,
            slug TEXT NOT NULL,
            title TEXT NOT NULL,
            summary TEXT NOT NULL,
            difficulty SMALLINT NOT NULL CHECK (difficulty BETWEEN 1 AND 5),
            starting_cash_cents BIGINT NOT NULL,
            duration_days INTEGER NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (world, industry, discipline, slug)
        )
        "#,
    },
    TableDef {
        name: "player_scenario_progress",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS player_scenario_progress (
            id BIGSERIAL PRIMARY KEY,
            player_id BIGINT NOT NULL REFERENCES player_profiles(id) ON DELETE CASCADE,
            scenario_id BIGINT NOT NULL REFERENCES scenarios(id) ON DELETE CASCADE,
            status TEXT NOT NULL DEFAULT 'in_progress',
            current_day INTEGER NOT NULL DEFAULT 1,
            score INTEGER NOT NULL DEFAULT 0,
            started_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            completed_at TIMESTAMPTZ,
            UNIQUE (player_id, scenario_id)
        )
        "#,
    },
    TableDef {
        name: "curriculum_tracks",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS curriculum_tracks (
            id BIGSERIAL PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            discipline TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL
        )
        "#,
    },
    TableDef {
        name: "curriculum_modules",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS curriculum_modules (
            id BIGSERIAL PRIMARY KEY,
            track_id BIGINT NOT NULL REFERENCES curriculum_tracks(id) ON DELETE CASCADE,
            discipline TEXT NOT NULL,
            position SMALLINT NOT NULL,
            title TEXT NOT NULL,
            objective TEXT NOT NULL,
            UNIQUE (track_id, position)
        )
        "#,
    },
    TableDef {
        name: "player_module_completions",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS player_module_completions (
            player_id BIGINT NOT NULL REFERENCES player_profiles(id) ON DELETE CASCADE,
            module_id BIGINT NOT NULL REFERENCES curriculum_modules(id) ON DELETE CASCADE,
            completed_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (player_id, module_id)
        )
        "#,
    },
    TableDef {
        name: "npcs",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS npcs (
            id BIGSERIAL PRIMARY KEY,
            world TEXT NOT NULL,
            slug TEXT NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            personality TEXT NOT NULL,
            industry TEXT,
            base_trust SMALLINT NOT NULL DEFAULT 50 CHECK (base_trust BETWEEN 0 AND 100),
            UNIQUE (world, slug)
        )
        "#,
    },
    TableDef {
        name: "npc_relationships",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS npc_relationships (
            player_id BIGINT NOT NULL REFERENCES player_profiles(id) ON DELETE CASCADE,
            npc_id BIGINT NOT NULL REFERENCES npcs(id) ON DELETE CASCADE,
            trust SMALLINT NOT NULL CHECK (trust BETWEEN 0 AND 100),
            last_interaction_at TIMESTAMPTZ,
            PRIMARY KEY (player_id, npc_id)
        )
        "#,
    },
    TableDef {
        name: "items",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS items (
            id BIGSERIAL PRIMARY KEY,
            category TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price_cents BIGINT NOT NULL CHECK (price_cents >= 0),
            effect JSONB NOT NULL DEFAULT '{}'::jsonb
        )
        "#,
    },
    TableDef {
        name: "player_inventory",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS player_inventory (
            id BIGSERIAL PRIMARY KEY,
            player_id BIGINT NOT NULL REFERENCES player_profiles(id) ON DELETE CASCADE,
            item_id BIGINT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
            quantity INTEGER NOT NULL DEFAULT 1 CHECK (quantity > 0),
            acquired_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    },
    // Ledger tables key on player_id without a foreign key so accounting can
    // be provisioned before a profile row exists.
    TableDef {
        name: "chart_of_accounts",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS chart_of_accounts (
            id BIGSERIAL PRIMARY KEY,
            player_id BIGINT NOT NULL,
            code TEXT NOT NULL,
            name TEXT NOT NULL,
            account_type TEXT NOT NULL,
            normal_balance TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (player_id, code)
        )
        "#,
    },
    TableDef {
        name: "accounting_periods",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS accounting_periods (
            id BIGSERIAL PRIMARY KEY,
            player_id BIGINT NOT NULL,
            period_number INTEGER NOT NULL,
            starts_on_day INTEGER NOT NULL,
            ends_on_day INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'open',
            UNIQUE (player_id, period_number)
        )
        "#,
    },
    TableDef {
        name: "account_balances",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS account_balances (
            id BIGSERIAL PRIMARY KEY,
            player_id BIGINT NOT NULL,
            account_id BIGINT NOT NULL REFERENCES chart_of_accounts(id) ON DELETE CASCADE,
            period_id BIGINT NOT NULL REFERENCES accounting_periods(id) ON DELETE CASCADE,
            balance_cents BIGINT NOT NULL DEFAULT 0,
            UNIQUE (account_id, period_id)
        )
        "#,
    },
    TableDef {
        name: "journal_entries",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS journal_entries (
            id BIGSERIAL PRIMARY KEY,
            player_id BIGINT NOT NULL,
            period_id BIGINT NOT NULL REFERENCES accounting_periods(id) ON DELETE CASCADE,
            game_day INTEGER NOT NULL,
            memo TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    },
    TableDef {
        name: "journal_lines",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS journal_lines (
            id BIGSERIAL PRIMARY KEY,
            entry_id BIGINT NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
            account_id BIGINT NOT NULL REFERENCES chart_of_accounts(id) ON DELETE CASCADE,
            debit_cents BIGINT NOT NULL DEFAULT 0 CHECK (debit_cents >= 0),
            credit_cents BIGINT NOT NULL DEFAULT 0 CHECK (credit_cents >= 0)
        )
        "#,
    },
    TableDef {
        name: "achievements",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS achievements (
            id BIGSERIAL PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            description TEXT NOT NULL
        )
        "#,
    },
    TableDef {
        name: "player_achievements",
        ddl: r#"
        CREATE TABLE IF NOT EXISTS player_achievements (
            player_id BIGINT NOT NULL REFERENCES player_profiles(id) ON DELETE CASCADE,
            achievement_id BIGINT NOT NULL REFERENCES achievements(id) ON DELETE CASCADE,
            earned_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (player_id, achievement_id)
        )
        "#,
    },
];

/// Columns added after the tables first shipped
pub const COLUMN_UPGRADES: &[&str] = &[
    "ALTER TABLE player_profiles ADD COLUMN IF NOT EXISTS last_login_at TIMESTAMPTZ",
    "ALTER TABLE player_profiles ADD COLUMN IF NOT EXISTS tutorial_completed BOOLEAN NOT NULL DEFAULT FALSE",
    "ALTER TABLE scenarios ADD COLUMN IF NOT EXISTS is_active BOOLEAN NOT NULL DEFAULT TRUE",
    "ALTER TABLE npcs ADD COLUMN IF NOT EXISTS portrait_url TEXT",
    "ALTER TABLE items ADD COLUMN IF NOT EXISTS is_tradeable BOOLEAN NOT NULL DEFAULT TRUE",
    "ALTER TABLE accounting_periods ADD COLUMN IF NOT EXISTS closed_at TIMESTAMPTZ",
];

pub const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_scenarios_natural_key ON scenarios (world, industry, discipline)",
    "CREATE INDEX IF NOT EXISTS idx_curriculum_modules_discipline ON curriculum_modules (discipline)",
    "CREATE INDEX IF NOT EXISTS idx_npcs_world ON npcs (world)",
    "CREATE INDEX IF NOT EXISTS idx_items_category ON items (category)",
    "CREATE INDEX IF NOT EXISTS idx_account_balances_player ON account_balances (player_id)",
    "CREATE INDEX IF NOT EXISTS idx_journal_entries_player ON journal_entries (player_id, game_day)",
];

/// Summary of a schema run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaReport {
    pub tables: usize,
    pub column_upgrades: usize,
    pub indexes: usize,
}

/// Creates or upgrades every table, column and index
///
/// Runs in one committed scope; re-running on an up-to-date database
/// changes nothing.
pub async fn ensure_schema(db: &PoolManager) -> AppResult<SchemaReport> {
    let report = db
        .with_scope(CommitPolicy::OnSuccess, |scope| async move {
            for table in TABLES {
                tracing::debug!(table = table.name, "Ensuring table");
                scope.execute(sqlx::query(table.ddl)).await?;
            }
            for statement in COLUMN_UPGRADES {
                scope.execute(sqlx::query(statement)).await?;
            }
            for statement in INDEXES {
                scope.execute(sqlx::query(statement)).await?;
            }

            Ok::<_, crate::error::AppError>(SchemaReport {
                tables: TABLES.len(),
                column_upgrades: COLUMN_UPGRADES.len(),
                indexes: INDEXES.len(),
            })
        })
        .await?;

    tracing::info!(
        tables = report.tables,
        column_upgrades = report.column_upgrades,
        indexes = report.indexes,
        "Schema up to date"
    );

    Ok(report)
}
