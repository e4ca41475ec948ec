use bevy::prelude::*;

use crate::terrain::Cell;

/* ===========================================================
   player
   =========================================================== */
#[derive(Component)]
pub struct PlayerSprite;

/* ===========================================================
   terrain helper components
   =========================================================== */
#[derive(Component)]
pub struct TileSprite {
    pub cell: Cell,
}

/// translucent square over the cell a swing would hit
#[derive(Component)]
pub struct AimMarker;

/* ===========================================================
   hud
   =========================================================== */
#[derive(Component)]
pub struct StatusText;

#[derive(Component)]
pub struct FlashText;

#[derive(Component)]
pub struct ShopPanel;
