use bevy::prelude::*;

/// -------- tiles & world size --------
pub const TILE_SIZE: f32     = 128.0;
pub const SKY_HEIGHT: f32    = 500.0;
pub const SCREEN_WIDTH: f32  = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;
pub const GRID_COLS: usize   = 1280 / 128 + 1; // one spare column past the screen edge
pub const GRID_ROWS: usize   = 40;

/// -------- player phys --------
pub const PLAYER_WIDTH: f32   =   85.0;
pub const PLAYER_HEIGHT: f32  =  100.0;
pub const GRAVITY: f32        = 1200.0; // y grows downward
pub const JUMP_IMPULSE: f32   = -600.0;
pub const WALK_SPEED: f32     =  300.0;

/// collision box is narrower than the sprite so corners don't snag walls
pub const COLL_INSET_X: f32   = 18.0;
pub const COLL_INSET_TOP: f32 =  6.0;

/// -------- world edges & shop --------
pub const WORLD_LEFT: f32     = 0.0;
pub const WORLD_RIGHT: f32    = SCREEN_WIDTH - PLAYER_WIDTH;
pub const SHOP_TRIGGER_X: f32 = WORLD_RIGHT - 2.0;
pub const SHOP_TRIGGER_SLACK: f32 = 8.0;
pub const SHOP_EXIT_OFFSET: f32   = 80.0;
pub const TELEPORT_OFFSET: f32    = 200.0;

/// -------- fossils --------
pub const FOSSIL_COUNT: usize   = 7;
pub const FOSSIL_HP: i32        = 16;
pub const FOSSIL_MIN_ROW: usize = 3;

/// -------- economy --------
pub const STARTING_COINS: u32     = 0;
pub const SANTA_SKIN_PRICE: u32   = 10_000;
pub const UNBREAKING_BASE_COST: u32 = 4;
pub const MAX_UPGRADE_LEVEL: u8   = 3;

/// -------- flash messages (seconds) --------
pub const FLASH_DEFAULT: f32 = 1.4;
pub const FLASH_REJECT: f32  = 1.0;
pub const FLASH_EVENT: f32   = 2.0;

/// -------- colour‑variation --------
pub const COLOR_NOISE_SCALE: f64        = 0.35;
pub const COLOR_VARIATION_LEVELS: i32   = 4;
pub const COLOR_VARIATION_STRENGTH: f32 = 0.12;
pub const DAMAGE_DARKEN: f32            = 160.0 / 255.0;

pub const SKY_COLOR: Color    = Color::srgb(0.18, 0.65, 1.0);
pub const PLAYER_COLOR: Color = Color::srgb(0.92, 0.80, 0.62);
pub const SANTA_COLOR: Color  = Color::srgb(0.85, 0.12, 0.12);
pub const AIM_COLOR: Color    = Color::srgba(1.0, 1.0, 1.0, 0.25);
