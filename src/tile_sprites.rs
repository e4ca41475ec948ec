//! block sprites: one flat coloured quad per solid cell, respawned only for
//! the cells the last tick touched

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use rand::Rng;

use crate::components::{AimMarker, TileSprite};
use crate::constants::*;
use crate::session::GameSession;
use crate::terrain::{Block, BlockKind, Cell, Ore};

#[derive(Resource)]
pub struct TileSprites {
    cols: usize,
    entities: Vec<Option<Entity>>,
    color_noise: Perlin,
}

impl TileSprites {
    fn slot(&self, cell: Cell) -> usize {
        cell.row as usize * self.cols + cell.col as usize
    }
}

/* ---------- helpers ---------- */

/// centre of a cell in bevy space (y up)
#[inline]
pub fn cell_translation(cell: Cell, z: f32) -> Vec3 {
    Vec3::new(
        (cell.col as f32 + 0.5) * TILE_SIZE,
        -(SKY_HEIGHT + (cell.row as f32 + 0.5) * TILE_SIZE),
        z,
    )
}

fn base_rgb(kind: BlockKind) -> Vec3 {
    match kind {
        BlockKind::Air => Vec3::ZERO,
        BlockKind::Grass => Vec3::new(0.30, 0.68, 0.22),
        BlockKind::Ore(Ore::Soil) => Vec3::new(0.55, 0.27, 0.07),
        BlockKind::Ore(Ore::Stone) => Vec3::new(0.50, 0.50, 0.50),
        BlockKind::Ore(Ore::Copper) => Vec3::new(0.72, 0.45, 0.20),
        BlockKind::Ore(Ore::Gold) => Vec3::new(0.95, 0.80, 0.20),
        BlockKind::Ore(Ore::Diamond) => Vec3::new(0.55, 0.90, 0.95),
        BlockKind::Ore(Ore::Ruby) => Vec3::new(0.85, 0.10, 0.25),
        BlockKind::Fossil(_) => Vec3::new(0.93, 0.90, 0.80),
    }
}

/// quantised noise banding, darkened one step per crack stage
pub fn block_color(noise: &Perlin, block: &Block) -> Color {
    let raw = noise.get([
        block.col as f64 * COLOR_NOISE_SCALE,
        block.row as f64 * COLOR_NOISE_SCALE,
    ]) as f32;

    let step = (((raw + 1.0) * 0.5) * COLOR_VARIATION_LEVELS as f32)
        .floor()
        .clamp(0.0, (COLOR_VARIATION_LEVELS - 1) as f32);
    let norm = step / (COLOR_VARIATION_LEVELS as f32 - 1.0) * 2.0 - 1.0;
    let variation = 1.0 + norm * COLOR_VARIATION_STRENGTH;

    let cracked = block.crack_stage() as f32 / 4.0;
    let damage = 1.0 - cracked * (1.0 - DAMAGE_DARKEN);

    let rgb = base_rgb(block.kind) * variation * damage;
    Color::srgb(rgb.x.clamp(0.0, 1.0), rgb.y.clamp(0.0, 1.0), rgb.z.clamp(0.0, 1.0))
}

fn spawn_tile(commands: &mut Commands, noise: &Perlin, block: &Block) -> Entity {
    let cell = Cell::new(block.row as i32, block.col as i32);
    commands
        .spawn((
            Sprite {
                color: block_color(noise, block),
                custom_size: Some(Vec2::splat(TILE_SIZE)),
                ..default()
            },
            Transform::from_translation(cell_translation(cell, 0.0)),
            TileSprite { cell },
        ))
        .id()
}

/* ---------- systems ---------- */

pub fn spawn_tiles_system(mut commands: Commands, session: Res<GameSession>) {
    let grid = session.grid();
    let color_noise = Perlin::new(rand::thread_rng().gen());

    let mut entities = vec![None; grid.rows() * grid.cols()];
    for (slot, block) in grid.blocks().iter().enumerate() {
        if block.kind.is_solid() {
            entities[slot] = Some(spawn_tile(&mut commands, &color_noise, block));
        }
    }
    debug!("spawned {} tile sprites", entities.iter().flatten().count());

    commands.insert_resource(TileSprites { cols: grid.cols(), entities, color_noise });
}

/// tidy‑up & redraw cells the last tick damaged or cleared
pub fn redraw_changed_tiles_system(
    mut commands: Commands,
    session: Res<GameSession>,
    sprites: Option<ResMut<TileSprites>>,
) {
    let Some(mut sprites) = sprites else { return };
    let sprites = &mut *sprites;
    let grid = session.grid();
    for cell in grid.changed_cells() {
        let Some(block) = grid.get(cell) else { continue };
        let slot = sprites.slot(cell);
        if let Some(e) = sprites.entities[slot].take() {
            commands.entity(e).despawn();
        }
        if block.kind.is_solid() {
            sprites.entities[slot] = Some(spawn_tile(&mut commands, &sprites.color_noise, block));
        }
    }
}

pub fn spawn_aim_marker(mut commands: Commands) {
    commands.spawn((
        Sprite {
            color: AIM_COLOR,
            custom_size: Some(Vec2::splat(TILE_SIZE)),
            ..default()
        },
        Transform::default(),
        Visibility::Hidden,
        AimMarker,
    ));
}

/// park the marker over the aimed block, hide it over air
pub fn sync_aim_marker_system(
    session: Res<GameSession>,
    mut marker_q: Query<(&mut Transform, &mut Visibility), With<AimMarker>>,
) {
    let Ok((mut tf, mut vis)) = marker_q.get_single_mut() else { return };
    let grid = session.grid();
    let aimed = session.aimed_cell().filter(|cell| grid.is_solid(*cell));
    match aimed {
        Some(cell) => {
            tf.translation = cell_translation(cell, 0.5);
            *vis = Visibility::Visible;
        }
        None => *vis = Visibility::Hidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cracks_darken_the_block() {
        let noise = Perlin::new(5);
        let mut block = Block::new(2, 3, BlockKind::Ore(Ore::Gold));
        let fresh = block_color(&noise, &block).to_srgba();
        block.hp = 1;
        let cracked = block_color(&noise, &block).to_srgba();
        assert!(cracked.red < fresh.red);
        assert!(cracked.green < fresh.green);
    }

    #[test]
    fn row_zero_sits_right_under_the_sky() {
        let t = cell_translation(Cell::new(0, 0), 0.0);
        assert_eq!(t.x, TILE_SIZE * 0.5);
        assert_eq!(t.y, -(SKY_HEIGHT + TILE_SIZE * 0.5));
    }
}
