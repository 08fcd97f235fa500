//! Scripted stand-ins for the player: strikes enemies, shops and leaves the
//! shop so a headless run can go through every wave.

use bevy::prelude::*;
use game::{
    character::{
        enemy::Enemy,
        health::{DamageRequest, Dead},
    },
    economy::CurrencyLedger,
    shop::{PurchaseRequest, ShopCatalog, ShopExitRequest, ShopGate, ShopItem},
    system_set::WaveSystemSet,
};
use utils::frame::FrameCount;

#[derive(Resource, Debug, Clone, Copy)]
pub struct AutoplayPlugin {
    pub strike_interval_frames: u32,
    pub strike_damage: f32,
    pub shop_browse_frames: u32,
}

impl Default for AutoplayPlugin {
    fn default() -> Self {
        Self {
            strike_interval_frames: 45,
            strike_damage: 50.0,
            shop_browse_frames: 90,
        }
    }
}

impl Plugin for AutoplayPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(*self);
        app.init_resource::<ShopVisit>();

        app.add_systems(
            Update,
            (strike_enemies, browse_shop).before(WaveSystemSet::DeathManagement),
        );
    }
}

#[derive(Resource, Debug, Default)]
struct ShopVisit {
    entered_at: Option<u32>,
    shopped: bool,
}

fn strike_enemies(
    frame: Res<FrameCount>,
    settings: Res<AutoplayPlugin>,
    enemies: Query<Entity, (With<Enemy>, Without<Dead>)>,
    mut damage: MessageWriter<DamageRequest>,
) {
    if settings.strike_interval_frames == 0 || frame.frame % settings.strike_interval_frames != 0 {
        return;
    }
    // Oldest enemy first
    if let Some(target) = enemies.iter().min_by_key(|entity| entity.to_bits()) {
        debug!("{} autoplay strikes {}", *frame, target);
        damage.write(DamageRequest {
            target,
            amount: settings.strike_damage,
        });
    }
}

/// Most expensive item the balance covers.
fn pick_item(catalog: &ShopCatalog, balance: u32) -> Option<&ShopItem> {
    catalog
        .items
        .iter()
        .filter(|item| u32::try_from(item.cost).is_ok_and(|cost| cost > 0 && cost <= balance))
        .max_by_key(|item| item.cost)
}

fn browse_shop(
    frame: Res<FrameCount>,
    settings: Res<AutoplayPlugin>,
    gate: Option<Res<ShopGate>>,
    catalog: Option<Res<ShopCatalog>>,
    ledger: Res<CurrencyLedger>,
    mut visit: ResMut<ShopVisit>,
    mut purchases: MessageWriter<PurchaseRequest>,
    mut exits: MessageWriter<ShopExitRequest>,
) {
    if !gate.is_some_and(|gate| gate.is_occupied()) {
        if visit.entered_at.is_some() {
            *visit = ShopVisit::default();
        }
        return;
    }

    let entered_at = *visit.entered_at.get_or_insert(frame.frame);
    if frame.frame < entered_at.saturating_add(settings.shop_browse_frames) {
        return;
    }

    if !visit.shopped {
        visit.shopped = true;
        if let Some(item) = catalog
            .as_deref()
            .and_then(|catalog| pick_item(catalog, ledger.current()))
        {
            info!("{} autoplay buys {}", *frame, item.id);
            purchases.write(PurchaseRequest {
                item: item.id.clone(),
            });
        }
        return;
    }

    info!("{} autoplay leaves the shop", *frame);
    exits.write(ShopExitRequest::default());
}
