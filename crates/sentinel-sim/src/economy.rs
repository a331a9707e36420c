//! Spendable currency with passive income.

use serde::{Deserialize, Serialize};

/// Player currency. The balance can never go negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    balance: u32,
    /// Currency per whole elapsed second.
    income_rate: u32,
    /// Elapsed time not yet converted into income.
    accrual: f32,
}

impl Economy {
    pub fn new(starting_balance: u32, income_rate: u32) -> Self {
        Self {
            balance: starting_balance,
            income_rate,
            accrual: 0.0,
        }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn can_afford(&self, amount: u32) -> bool {
        self.balance >= amount
    }

    /// Deduct `amount`. Fails without side effects for a zero amount or
    /// when the balance is short.
    pub fn spend(&mut self, amount: u32) -> bool {
        if amount == 0 || self.balance < amount {
            return false;
        }
        self.balance -= amount;
        true
    }

    /// Credit `amount`. Zero is ignored.
    pub fn add(&mut self, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        self.balance = self.balance.saturating_add(amount);
        true
    }

    /// Accrue passive income for `dt` seconds. Returns the amount credited.
    ///
    /// Only whole seconds pay out; the fractional remainder carries over.
    pub fn update(&mut self, dt: f32) -> u32 {
        self.accrual += dt.max(0.0);
        if self.accrual < 1.0 {
            return 0;
        }
        let whole = self.accrual.floor();
        self.accrual -= whole;
        let income = (whole as u32).saturating_mul(self.income_rate);
        self.add(income);
        income
    }
}
