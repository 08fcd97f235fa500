pub mod ledger;
pub mod reward;

use bevy::prelude::*;

use crate::system_set::WaveSystemSet;

pub use ledger::{CurrencyChanged, CurrencyLedger, LedgerError};
pub use reward::{dispatch_reward, RewardOutcome};

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrencyLedger>();
        app.add_message::<CurrencyChanged>();

        app.add_systems(
            Update,
            ledger::publish_currency_changes.in_set(WaveSystemSet::Presentation),
        );
    }
}
