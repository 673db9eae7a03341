use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Top-level classification of a ledger account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Revenue => "revenue",
            AccountType::Expense => "expense",
        }
    }

    /// Side on which increases are recorded for a regular account
    pub fn normal_balance(&self) -> NormalBalance {
        match self {
            AccountType::Asset | AccountType::Expense => NormalBalance::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                NormalBalance::Credit
            }
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalBalance {
    Debit,
    Credit,
}

impl NormalBalance {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalBalance::Debit => "debit",
            NormalBalance::Credit => "credit",
        }
    }

    fn flipped(self) -> Self {
        match self {
            NormalBalance::Debit => NormalBalance::Credit,
            NormalBalance::Credit => NormalBalance::Debit,
        }
    }
}

/// One row of the standard chart of accounts every player starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountTemplate {
    pub code: &'static str,
    pub name: &'static str,
    pub account_type: AccountType,
    /// Contra accounts (e.g. accumulated depreciation) carry the opposite balance
    pub contra: bool,
}

impl AccountTemplate {
    pub fn normal_balance(&self) -> NormalBalance {
        let normal = self.account_type.normal_balance();
        if self.contra {
            normal.flipped()
        } else {
            normal
        }
    }
}

/// A player's balance on one account, as read back from the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub normal_balance: NormalBalance,
    pub balance_cents: i64,
}
