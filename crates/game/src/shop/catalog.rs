use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utils::frame::FrameCount;

use crate::economy::{CurrencyLedger, LedgerError};

use super::ShopGate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub cost: i32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ShopCatalog {
    pub items: Vec<ShopItem>,
}

impl ShopCatalog {
    pub fn find(&self, id: &str) -> Option<&ShopItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("the shop is closed")]
    ShopClosed,
    #[error("unknown shop item '{0}'")]
    UnknownItem(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub item: String,
}

/// A paid purchase. Applying the item's effect is up to its consumer.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ItemPurchased {
    pub item: ShopItem,
    pub balance: u32,
}

pub fn purchase(
    shop_open: bool,
    catalog: &ShopCatalog,
    ledger: &mut CurrencyLedger,
    id: &str,
) -> Result<ItemPurchased, PurchaseError> {
    if !shop_open {
        return Err(PurchaseError::ShopClosed);
    }
    let item = catalog
        .find(id)
        .ok_or_else(|| PurchaseError::UnknownItem(id.to_string()))?;
    let balance = ledger.spend(item.cost)?;

    Ok(ItemPurchased {
        item: item.clone(),
        balance,
    })
}

pub fn process_purchase_requests(
    frame: Res<FrameCount>,
    mut requests: MessageReader<PurchaseRequest>,
    gate: Option<Res<ShopGate>>,
    catalog: Option<Res<ShopCatalog>>,
    mut ledger: ResMut<CurrencyLedger>,
    mut purchased: MessageWriter<ItemPurchased>,
) {
    let shop_open = gate.is_some_and(|gate| gate.is_occupied());
    let empty = ShopCatalog::default();
    let catalog = catalog.as_deref().unwrap_or(&empty);

    for request in requests.read() {
        match purchase(shop_open, catalog, &mut ledger, &request.item) {
            Ok(done) => {
                info!(
                    "{} shop_purchase item={} cost={} balance={}",
                    *frame, done.item.id, done.item.cost, done.balance
                );
                purchased.write(done);
            }
            Err(err) => warn!("{} shop_purchase item={} refused: {}", *frame, request.item, err),
        }
    }
}
