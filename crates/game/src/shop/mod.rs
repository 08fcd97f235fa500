//! Shop interlude between waves.
//!
//! The [`ShopGate`] is an exclusive latch: the wave task enters it once a wave
//! is cleared and then polls it until an external exit trigger releases the
//! player.

pub mod catalog;

use bevy::{ecs::system::SystemParam, prelude::*};
use utils::frame::FrameCount;

use crate::{
    character::player::{teleport, MotionController, Player},
    system_set::WaveSystemSet,
};

pub use catalog::{ItemPurchased, PurchaseError, PurchaseRequest, ShopCatalog, ShopItem};

#[derive(Resource, Debug, Clone)]
pub struct ShopGate {
    shop_spawn: Transform,
    exit_destination: Option<Transform>,
    occupied: bool,
    entry_pose: Option<Transform>,
}

impl ShopGate {
    pub fn new(shop_spawn: Transform, exit_destination: Option<Transform>) -> Self {
        Self {
            shop_spawn,
            exit_destination,
            occupied: false,
            entry_pose: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Pose the player had when entering, kept until the next exit.
    pub fn entry_pose(&self) -> Option<&Transform> {
        self.entry_pose.as_ref()
    }

    /// Moves the player into the shop. Returns false without touching anything
    /// when the player is already inside.
    pub fn enter(&mut self, player: &mut Transform, motion: Option<&mut MotionController>) -> bool {
        if self.occupied {
            return false;
        }
        self.entry_pose = Some(*player);
        teleport(player, motion, &self.shop_spawn);
        self.occupied = true;
        true
    }

    /// Moves the player out of the shop to `destination`, falling back to the
    /// configured exit point and then to the pose saved on entry. Returns
    /// false without touching anything when the player is not inside.
    pub fn exit(
        &mut self,
        destination: Option<Transform>,
        player: &mut Transform,
        motion: Option<&mut MotionController>,
    ) -> bool {
        if !self.occupied {
            return false;
        }
        let entry_pose = self.entry_pose.take();
        if let Some(target) = destination.or(self.exit_destination).or(entry_pose) {
            teleport(player, motion, &target);
        }
        self.occupied = false;
        true
    }
}

/// Visual part of the shop, shown only while the player is inside.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ShopPresentation {
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopEntry {
    Entered,
    AlreadyInside,
    NoGate,
    NoPlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopExit {
    Left,
    NotInside,
    NoGate,
    NoPlayer,
}

/// Sent by the shop's exit trigger.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ShopExitRequest {
    pub destination: Option<Transform>,
}

/// World access needed to move the player in and out of the shop.
#[derive(SystemParam)]
pub struct ShopAccess<'w, 's> {
    gate: Option<ResMut<'w, ShopGate>>,
    player: Query<'w, 's, (&'static mut Transform, Option<&'static mut MotionController>), With<Player>>,
    presentations: Query<'w, 's, &'static mut ShopPresentation>,
}

impl ShopAccess<'_, '_> {
    pub fn is_occupied(&self) -> Option<bool> {
        self.gate.as_ref().map(|gate| gate.is_occupied())
    }

    pub fn enter(&mut self) -> ShopEntry {
        let Some(gate) = self.gate.as_mut() else {
            return ShopEntry::NoGate;
        };
        if gate.is_occupied() {
            return ShopEntry::AlreadyInside;
        }
        let Ok((mut transform, mut motion)) = self.player.single_mut() else {
            return ShopEntry::NoPlayer;
        };

        gate.enter(&mut transform, motion.as_deref_mut());
        for mut presentation in self.presentations.iter_mut() {
            presentation.active = true;
        }
        ShopEntry::Entered
    }

    pub fn exit(&mut self, destination: Option<Transform>) -> ShopExit {
        let Some(gate) = self.gate.as_mut() else {
            return ShopExit::NoGate;
        };
        if !gate.is_occupied() {
            return ShopExit::NotInside;
        }
        let Ok((mut transform, mut motion)) = self.player.single_mut() else {
            return ShopExit::NoPlayer;
        };

        gate.exit(destination, &mut transform, motion.as_deref_mut());
        for mut presentation in self.presentations.iter_mut() {
            presentation.active = false;
        }
        ShopExit::Left
    }
}

pub fn process_shop_exit_requests(
    frame: Res<FrameCount>,
    mut requests: MessageReader<ShopExitRequest>,
    mut shop: ShopAccess,
) {
    for request in requests.read() {
        match shop.exit(request.destination) {
            ShopExit::Left => info!("{} shop_exit player left the shop", *frame),
            ShopExit::NotInside => debug!("{} shop_exit ignored, player not in shop", *frame),
            ShopExit::NoGate => warn!("{} shop_exit requested but no shop is installed", *frame),
            ShopExit::NoPlayer => warn!("{} shop_exit requested but there is no player", *frame),
        }
    }
}

pub fn sync_shop_presentation(
    mut query: Query<(&ShopPresentation, &mut Visibility), Changed<ShopPresentation>>,
) {
    for (presentation, mut visibility) in query.iter_mut() {
        *visibility = if presentation.active {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

pub struct ShopPlugin;

impl Plugin for ShopPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ShopExitRequest>();
        app.add_message::<PurchaseRequest>();
        app.add_message::<ItemPurchased>();

        app.add_systems(
            Update,
            (process_shop_exit_requests, catalog::process_purchase_requests)
                .chain()
                .in_set(WaveSystemSet::Shop),
        );
        app.add_systems(
            Update,
            sync_shop_presentation.in_set(WaveSystemSet::Presentation),
        );
    }
}
