use crate::db::{CommitPolicy, PoolManager};
use crate::error::{AppError, AppResult};
use crate::models::{AccountBalance, AccountTemplate, AccountType};

/// Capital every new player's business starts with ($10,000)
pub const STARTING_CAPITAL_CENTS: i64 = 1_000_000;

/// Length of the first accounting period in game days
pub const FIRST_PERIOD_DAYS: i32 = 30;

pub const CASH_CODE: &str = "1000";
pub const OWNER_CAPITAL_CODE: &str = "3000";

pub const STANDARD_CHART: &[AccountTemplate] = &[
    account("1000", "Cash", AccountType::Asset),
    account("1100", "Accounts Receivable", AccountType::Asset),
    account("1200", "Inventory", AccountType::Asset),
    account("1300", "Prepaid Expenses", AccountType::Asset),
    account("1500", "Equipment", AccountType::Asset),
    contra("1550", "Accumulated Depreciation", AccountType::Asset),
    account("2000", "Accounts Payable", AccountType::Liability),
    account("2100", "Accrued Liabilities", AccountType::Liability),
    account("2500", "Loans Payable", AccountType::Liability),
    account("3000", "Owner's Capital", AccountType::Equity),
    account("3100", "Retained Earnings", AccountType::Equity),
    account("4000", "Sales Revenue", AccountType::Revenue),
    account("5000", "Cost of Goods Sold", AccountType::Expense),
    account("6000", "Operating Expenses", AccountType::Expense),
    account("6100", "Wages Expense", AccountType::Expense),
    account("6200", "Rent Expense", AccountType::Expense),
];

const fn account(
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
) -> AccountTemplate {
    AccountTemplate {
        code,
        name,
        account_type,
        contra: false,
    }
}

const fn contra(
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
) -> AccountTemplate {
    AccountTemplate {
        code,
        name,
        account_type,
        contra: true,
    }
}

/// Opening balances written for a new player: (account code, balance)
pub const OPENING_BALANCES: &[(&str, i64)] = &[
    (CASH_CODE, STARTING_CAPITAL_CENTS),
    (OWNER_CAPITAL_CODE, STARTING_CAPITAL_CENTS),
];

/// Gives a player the standard chart of accounts, an open first period and
/// opening balances
///
/// Returns `false` without writing anything when the player already has
/// accounts. Everything is written in one committed scope, so a failure
/// leaves no partial ledger behind.
pub async fn initialize_player_accounting(db: &PoolManager, player_id: i64) -> AppResult<bool> {
    let created = db
        .with_scope(CommitPolicy::OnSuccess, |scope| async move {
            let existing = scope
                .has_rows(
                    sqlx::query("SELECT COUNT(*) FROM chart_of_accounts WHERE player_id = $1")
                        .bind(player_id),
                )
                .await?;
            if existing {
                return Ok::<_, AppError>(false);
            }

            let mut account_ids = Vec::with_capacity(STANDARD_CHART.len());
            for account in STANDARD_CHART {
                let id: i64 = scope
                    .fetch_one(
                        sqlx::query(
                            "INSERT INTO chart_of_accounts \
                             (player_id, code, name, account_type, normal_balance) \
                             VALUES ($1, $2, $3, $4, $5) RETURNING id",
                        )
                        .bind(player_id)
                        .bind(account.code)
                        .bind(account.name)
                        .bind(account.account_type.as_str())
                        .bind(account.normal_balance().as_str()),
                    )
                    .await?
                    .get_as("id")?;
                account_ids.push((account.code, id));
            }

            let period_id: i64 = scope
                .fetch_one(
                    sqlx::query(
                        "INSERT INTO accounting_periods \
                         (player_id, period_number, starts_on_day, ends_on_day, status) \
                         VALUES ($1, 1, 1, $2, 'open') RETURNING id",
                    )
                    .bind(player_id)
                    .bind(FIRST_PERIOD_DAYS),
                )
                .await?
                .get_as("id")?;

            for (code, balance_cents) in OPENING_BALANCES {
                let account_id = account_ids
                    .iter()
                    .find(|(account_code, _)| account_code == code)
                    .map(|(_, id)| *id)
                    .ok_or_else(|| {
                        AppError::Decode(format!("opening balance for unknown account {}", code))
                    })?;

                scope
                    .execute(
                        sqlx::query(
                            "INSERT INTO account_balances \
                             (player_id, account_id, period_id, balance_cents) \
                             VALUES ($1, $2, $3, $4)",
                        )
                        .bind(player_id)
                        .bind(account_id)
                        .bind(period_id)
                        .bind(*balance_cents),
                    )
                    .await?;
            }

            Ok(true)
        })
        .await?;

    if created {
        tracing::info!(
            player_id,
            accounts = STANDARD_CHART.len(),
            starting_capital_cents = STARTING_CAPITAL_CENTS,
            "Initialized player accounting"
        );
    } else {
        tracing::debug!(player_id, "Player accounting already initialized");
    }

    Ok(created)
}

/// Current balances for a player, ordered by account code
///
/// Accounts without a balance row report zero.
pub async fn player_balances(db: &PoolManager, player_id: i64) -> AppResult<Vec<AccountBalance>> {
    db.with_scope(CommitPolicy::Never, |scope| async move {
        let records = scope
            .fetch_all(
                sqlx::query(
                    "SELECT a.code, a.name, a.account_type, a.normal_balance, \
                     COALESCE(SUM(b.balance_cents), 0)::BIGINT AS balance_cents \
                     FROM chart_of_accounts a \
                     LEFT JOIN account_balances b ON b.account_id = a.id \
                     WHERE a.player_id = $1 \
                     GROUP BY a.id, a.code, a.name, a.account_type, a.normal_balance \
                     ORDER BY a.code",
                )
                .bind(player_id),
            )
            .await?;

        records
            .into_iter()
            .map(|record| record.into_model::<AccountBalance>())
            .collect::<AppResult<Vec<_>>>()
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalBalance;
    use std::collections::HashSet;

    #[test]
    fn test_chart_codes_unique() {
        let codes: HashSet<_> = STANDARD_CHART.iter().map(|a| a.code).collect();
        assert_eq!(codes.len(), STANDARD_CHART.len());
    }

    #[test]
    fn test_chart_sorted_by_code() {
        let codes: Vec<_> = STANDARD_CHART.iter().map(|a| a.code).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_chart_covers_every_account_type() {
        let types: HashSet<_> = STANDARD_CHART.iter().map(|a| a.account_type).collect();
        assert_eq!(types.len(), 5);
    }

    #[test]
    fn test_opening_balances_reference_chart() {
        for (code, _) in OPENING_BALANCES {
            assert!(STANDARD_CHART.iter().any(|a| a.code == *code), "{}", code);
        }
        assert_eq!(OPENING_BALANCES.len(), 2);
    }

    #[test]
    fn test_opening_balances_are_balanced() {
        let (mut debits, mut credits) = (0_i64, 0_i64);
        for (code, amount) in OPENING_BALANCES {
            let account = STANDARD_CHART.iter().find(|a| a.code == *code).unwrap();
            match account.normal_balance() {
                NormalBalance::Debit => debits += amount,
                NormalBalance::Credit => credits += amount,
            }
        }
        assert_eq!(debits, credits);
        assert_eq!(debits, STARTING_CAPITAL_CENTS);
    }

    #[test]
    fn test_cash_and_capital_codes() {
        let cash = STANDARD_CHART.iter().find(|a| a.code == CASH_CODE).unwrap();
        assert_eq!(cash.name, "Cash");
        assert_eq!(cash.account_type, AccountType::Asset);

        let capital = STANDARD_CHART
            .iter()
            .find(|a| a.code == OWNER_CAPITAL_CODE)
            .unwrap();
        assert_eq!(capital.account_type, AccountType::Equity);
    }
}
