use bevy::prelude::*;

use crate::{
    economy::CurrencyChanged,
    waves::WaveProgressUpdate,
};

/// Plain text the HUD shows about the waves.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveProgressText {
    pub headline: String,
    pub detail: String,
    pub currency: String,
}

impl WaveProgressText {
    pub fn apply(&mut self, update: &WaveProgressUpdate) {
        match update {
            WaveProgressUpdate::Preparing { number } => {
                self.headline = format!("Preparing wave {}", number);
                self.detail.clear();
            }
            WaveProgressUpdate::Wave {
                number,
                total,
                remaining,
            } => {
                self.headline = format!("Wave {} / {}", number, total);
                self.detail = remaining_text(*remaining);
            }
            WaveProgressUpdate::EnemiesRemaining { remaining } => {
                self.detail = remaining_text(*remaining);
            }
            WaveProgressUpdate::Completed => {
                self.headline = "All waves completed!".to_string();
                self.detail.clear();
            }
            WaveProgressUpdate::Halted { reason } => {
                self.headline = "Waves stopped".to_string();
                self.detail = reason.to_string();
            }
            WaveProgressUpdate::GameOver => {
                self.headline = "GAME OVER".to_string();
                self.detail.clear();
            }
        }
    }
}

fn remaining_text(remaining: u32) -> String {
    format!("Enemies remaining: {}", remaining)
}

/// Which line of [`WaveProgressText`] a `Text` entity mirrors.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveProgressLabel {
    Headline,
    Detail,
    Currency,
}

pub fn apply_progress_updates(
    mut updates: MessageReader<WaveProgressUpdate>,
    mut currency: MessageReader<CurrencyChanged>,
    mut text: ResMut<WaveProgressText>,
) {
    let before = text.clone();

    for update in updates.read() {
        text.apply(update);
    }
    if let Some(change) = currency.read().last() {
        text.currency = format!("Currency: {}", change.balance);
    }

    if *text != before {
        info!("hud | {} | {} | {}", text.headline, text.detail, text.currency);
    }
}

pub fn sync_progress_labels(
    text: Res<WaveProgressText>,
    mut labels: Query<(&WaveProgressLabel, &mut Text)>,
) {
    if !text.is_changed() {
        return;
    }
    for (label, mut value) in labels.iter_mut() {
        let line = match label {
            WaveProgressLabel::Headline => &text.headline,
            WaveProgressLabel::Detail => &text.detail,
            WaveProgressLabel::Currency => &text.currency,
        };
        if value.0 != *line {
            value.0 = line.clone();
        }
    }
}
