use bevy::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i32),
    #[error("insufficient funds: balance {balance}, cost {cost}")]
    InsufficientFunds { balance: u32, cost: u32 },
}

/// The player's currency balance. Never negative.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyLedger {
    balance: u32,
}

impl CurrencyLedger {
    pub fn with_balance(balance: u32) -> Self {
        Self { balance }
    }

    pub fn current(&self) -> u32 {
        self.balance
    }

    /// Credits `amount`. Returns false, leaving the balance untouched, when
    /// `amount` is not positive.
    pub fn add(&mut self, amount: i32) -> bool {
        if amount <= 0 {
            return false;
        }
        self.balance = self.balance.saturating_add(amount as u32);
        true
    }

    /// Debits `amount` and returns the new balance.
    pub fn spend(&mut self, amount: i32) -> Result<u32, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        let cost = amount as u32;
        if cost > self.balance {
            return Err(LedgerError::InsufficientFunds {
                balance: self.balance,
                cost,
            });
        }
        self.balance -= cost;
        Ok(self.balance)
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyChanged {
    pub previous: Option<u32>,
    pub balance: u32,
}

pub fn publish_currency_changes(
    ledger: Res<CurrencyLedger>,
    mut last: Local<Option<u32>>,
    mut writer: MessageWriter<CurrencyChanged>,
) {
    let balance = ledger.current();
    if *last == Some(balance) {
        return;
    }

    debug!("currency changed {:?} -> {}", *last, balance);
    writer.write(CurrencyChanged {
        previous: *last,
        balance,
    });
    *last = Some(balance);
}
