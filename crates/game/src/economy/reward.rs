use bevy::prelude::*;

use super::ledger::CurrencyLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardOutcome {
    Credited(u32),
    /// Zero or negative reward, nothing to pay.
    Skipped,
    MissingRewardData,
}

/// Pays the reward of a deceased enemy into the ledger.
pub fn dispatch_reward(ledger: &mut CurrencyLedger, reward: Option<i32>) -> RewardOutcome {
    let Some(amount) = reward else {
        return RewardOutcome::MissingRewardData;
    };

    if ledger.add(amount) {
        trace!("reward credited amount={} balance={}", amount, ledger.current());
        RewardOutcome::Credited(amount as u32)
    } else {
        RewardOutcome::Skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_reward_is_credited() {
        let mut ledger = CurrencyLedger::default();
        assert_eq!(dispatch_reward(&mut ledger, Some(10)), RewardOutcome::Credited(10));
        assert_eq!(ledger.current(), 10);
    }

    #[test]
    fn zero_or_negative_reward_is_a_silent_noop() {
        let mut ledger = CurrencyLedger::with_balance(4);
        assert_eq!(dispatch_reward(&mut ledger, Some(0)), RewardOutcome::Skipped);
        assert_eq!(dispatch_reward(&mut ledger, Some(-5)), RewardOutcome::Skipped);
        assert_eq!(ledger.current(), 4);
    }

    #[test]
    fn missing_reward_is_reported() {
        let mut ledger = CurrencyLedger::default();
        assert_eq!(dispatch_reward(&mut ledger, None), RewardOutcome::MissingRewardData);
        assert_eq!(ledger.current(), 0);
    }
}
