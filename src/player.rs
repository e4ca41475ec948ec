//! player body: intent integration, gravity & tile collision, plus the
//! systems that feed it keyboard input and mirror it onto a sprite

use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::components::PlayerSprite;
use crate::constants::*;
use crate::session::{FrameIntents, GameSession, Intent};
use crate::terrain::{col_at, row_at, Cell, TileGrid};
use crate::tools::ToolKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MineDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/* ===========================================================
   body
   =========================================================== */
/// `pos` is the top‑left of the sprite box, y grows downward
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerBody {
    pub pos: Vec2,
    pub vertical_velocity: f32,
    pub on_ground: bool,
    pub facing: Facing,
}

impl PlayerBody {
    pub fn standing_at(grid: &TileGrid, x: f32) -> Self {
        let mut body = Self {
            pos: Vec2::ZERO,
            vertical_velocity: 0.0,
            on_ground: true,
            facing: Facing::Right,
        };
        body.place_on_ground(grid, x);
        body
    }

    pub fn place_on_ground(&mut self, grid: &TileGrid, x: f32) {
        self.pos = Vec2::new(x, grid.ground_y(x));
        self.vertical_velocity = 0.0;
        self.on_ground = true;
    }

    #[inline]
    fn col_left(&self) -> f32 {
        self.pos.x + COLL_INSET_X
    }
    #[inline]
    fn col_right(&self) -> f32 {
        self.pos.x + PLAYER_WIDTH - COLL_INSET_X
    }

    /// left inset, centre and right inset of the collision box
    fn column_samples(&self) -> [f32; 3] {
        [
            self.col_left() + 2.0,
            self.pos.x + PLAYER_WIDTH * 0.5,
            self.col_right() - 2.0,
        ]
    }

    /// one simulation step: integrate, then resolve against the grid
    pub fn step(&mut self, grid: &TileGrid, intent: MoveIntent, dt: f32) {
        self.integrate(intent, dt);
        if !self.snap_to_ground(grid) {
            self.rest_on_world_floor(grid);
        }
        if self.vertical_velocity < 0.0 {
            self.snap_to_ceiling(grid);
        }
        self.resolve_walls(grid);
        self.clamp_to_world();
    }

    pub fn integrate(&mut self, intent: MoveIntent, dt: f32) {
        let mut dir = 0.0;
        if intent.left && self.pos.x > WORLD_LEFT {
            dir -= 1.0;
            self.facing = Facing::Left;
        }
        if intent.right && self.pos.x < WORLD_RIGHT {
            dir += 1.0;
            self.facing = Facing::Right;
        }
        if intent.jump && self.on_ground {
            self.vertical_velocity = JUMP_IMPULSE;
            self.on_ground = false;
        }

        self.vertical_velocity += GRAVITY * dt;
        self.pos.y += self.vertical_velocity * dt;
        self.pos.x += dir * WALK_SPEED * dt;
        self.clamp_to_world();
    }

    /// lands the body on the first solid sample under its feet; a body
    /// with nothing underneath is airborne
    pub fn snap_to_ground(&mut self, grid: &TileGrid) -> bool {
        let feet = self.pos.y + PLAYER_HEIGHT;
        let row = row_at(feet);
        for x in self.column_samples() {
            let Some(block) = grid.get(Cell::new(row, col_at(x))) else { continue };
            if block.kind.is_solid() && self.vertical_velocity >= 0.0 && feet >= block.y() {
                self.pos.y = block.y() - PLAYER_HEIGHT;
                self.vertical_velocity = 0.0;
                self.on_ground = true;
                return true;
            }
        }
        self.on_ground = false;
        false
    }

    pub fn snap_to_ceiling(&mut self, grid: &TileGrid) {
        let head = self.pos.y + COLL_INSET_TOP;
        let row = row_at(head);
        for x in self.column_samples() {
            let Some(block) = grid.get(Cell::new(row, col_at(x))) else { continue };
            let bottom = block.y() + TILE_SIZE;
            if block.kind.is_solid() && head < bottom {
                self.pos.y = bottom - COLL_INSET_TOP;
                self.vertical_velocity = 0.0;
                return;
            }
        }
    }

    pub fn resolve_walls(&mut self, grid: &TileGrid) {
        for probe_y in [
            self.pos.y + PLAYER_HEIGHT * 0.30,
            self.pos.y + PLAYER_HEIGHT * 0.70,
        ] {
            let row = row_at(probe_y);

            let right = self.col_right();
            if let Some(block) = grid.get(Cell::new(row, col_at(right))) {
                if block.kind.is_solid() && right > block.x() {
                    self.pos.x = block.x() - PLAYER_WIDTH + COLL_INSET_X;
                }
            }

            let left = self.col_left();
            if let Some(block) = grid.get(Cell::new(row, col_at(left))) {
                if block.kind.is_solid() && left < block.x() + TILE_SIZE {
                    self.pos.x = block.x() + TILE_SIZE - COLL_INSET_X;
                }
            }
        }
    }

    pub fn clamp_to_world(&mut self) {
        self.pos.x = self.pos.x.clamp(WORLD_LEFT, WORLD_RIGHT);
    }

    /// drop the grounded flag once nothing solid is left under the feet
    pub fn refresh_support(&mut self, grid: &TileGrid) {
        let row = row_at(self.pos.y + PLAYER_HEIGHT);
        let supported = self
            .column_samples()
            .into_iter()
            .any(|x| grid.is_solid(Cell::new(row, col_at(x))));
        if !supported {
            self.on_ground = false;
        }
    }

    /// the bottom of the grid is a hard floor
    pub fn rest_on_world_floor(&mut self, grid: &TileGrid) {
        let floor = grid.fallback_ground() - PLAYER_HEIGHT;
        if self.pos.y >= floor {
            self.pos.y = floor;
            self.vertical_velocity = self.vertical_velocity.min(0.0);
            self.on_ground = true;
        }
    }

    /// cell hit by a swing in `dir`
    pub fn target_cell(&self, dir: MineDirection) -> Cell {
        let col = col_at(self.pos.x + PLAYER_WIDTH * 0.5);
        let body = row_at(self.pos.y).max(0);
        let feet = row_at(self.pos.y + PLAYER_HEIGHT).max(0);
        match dir {
            MineDirection::Right => Cell::new(body, col + 1),
            MineDirection::Left => Cell::new(body, col - 1),
            MineDirection::Down => Cell::new(feet, col),
            MineDirection::Up => Cell::new(body - 1, col),
        }
    }

    pub fn at_surface(&self) -> bool {
        self.pos.y <= SKY_HEIGHT - PLAYER_HEIGHT + SHOP_TRIGGER_SLACK
    }

    pub fn at_shop_door(&self) -> bool {
        self.pos.x >= SHOP_TRIGGER_X && self.at_surface()
    }
}

/* ===========================================================
   input (WASD / Space / arrows + E)
   =========================================================== */
pub fn player_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut intents: ResMut<FrameIntents>,
) {
    if keys.pressed(KeyCode::KeyA) {
        intents.push(Intent::MoveLeft);
    }
    if keys.pressed(KeyCode::KeyD) {
        intents.push(Intent::MoveRight);
    }
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::Space) {
        intents.push(Intent::Jump);
    }

    /* held arrow aims, E swings at it */
    let aimed = [
        (KeyCode::ArrowRight, MineDirection::Right),
        (KeyCode::ArrowLeft, MineDirection::Left),
        (KeyCode::ArrowDown, MineDirection::Down),
        (KeyCode::ArrowUp, MineDirection::Up),
    ]
    .into_iter()
    .find(|(key, _)| keys.pressed(*key));
    if let Some((_, dir)) = aimed {
        intents.push(Intent::Aim(dir));
        if keys.just_pressed(KeyCode::KeyE) {
            intents.push(Intent::Mine(dir));
        }
    }

    /* 1‑5 hot‑keys */
    let hotkeys = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
    ];
    for (key, tool) in hotkeys.into_iter().zip(ToolKind::ALL) {
        if keys.just_pressed(key) {
            intents.push(Intent::EquipTool(tool));
        }
    }

    if keys.just_pressed(KeyCode::KeyT) {
        intents.push(Intent::TeleportToSurface);
    }
}

/* ===========================================================
   sprite follows the simulated body
   =========================================================== */
pub fn spawn_player_sprite(mut commands: Commands) {
    commands.spawn((
        Sprite {
            color: PLAYER_COLOR,
            custom_size: Some(Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        PlayerSprite,
    ));
}

pub fn sync_player_sprite_system(
    session: Res<GameSession>,
    mut q: Query<(&mut Transform, &mut Sprite), With<PlayerSprite>>,
) {
    let Ok((mut tf, mut sprite)) = q.get_single_mut() else { return };
    let snapshot = session.snapshot();
    let body = snapshot.player;

    tf.translation.x = body.pos.x + PLAYER_WIDTH * 0.5;
    tf.translation.y = -(body.pos.y + PLAYER_HEIGHT * 0.5);
    tf.scale.x = match body.facing {
        Facing::Left => -tf.scale.x.abs(),
        Facing::Right => tf.scale.x.abs(),
    };
    sprite.color = match snapshot.skin {
        Some(_) => SANTA_COLOR,
        None => PLAYER_COLOR,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{BlockKind, Ore};

    const DT: f32 = 1.0 / 60.0;
    const STONE: BlockKind = BlockKind::Ore(Ore::Stone);

    fn flat(rows: usize, cols: usize) -> TileGrid {
        TileGrid::from_fn(rows, cols, |_, _| STONE)
    }

    fn top_of(row: usize) -> f32 {
        SKY_HEIGHT + row as f32 * TILE_SIZE
    }

    #[test]
    fn grounded_body_is_a_fixed_point() {
        let grid = flat(6, GRID_COLS);
        let mut body = PlayerBody::standing_at(&grid, 300.0);
        let start = body.pos;
        assert_eq!(start.y, SKY_HEIGHT - PLAYER_HEIGHT);
        for _ in 0..240 {
            body.step(&grid, MoveIntent::default(), DT);
            assert_eq!(body.pos, start);
            assert!(body.on_ground);
            assert_eq!(body.vertical_velocity, 0.0);
        }
    }

    #[test]
    fn jump_only_leaves_the_ground_once() {
        let grid = flat(6, GRID_COLS);
        let mut body = PlayerBody::standing_at(&grid, 300.0);
        let jump = MoveIntent { jump: true, ..default() };

        body.step(&grid, jump, DT);
        assert!(!body.on_ground);
        assert!(body.vertical_velocity < 0.0);
        let lifted = body.pos.y;
        assert!(lifted < SKY_HEIGHT - PLAYER_HEIGHT);

        // holding jump mid‑air never re‑applies the impulse
        body.step(&grid, jump, DT);
        assert!(body.vertical_velocity > JUMP_IMPULSE + GRAVITY * DT);

        for _ in 0..240 {
            body.step(&grid, MoveIntent::default(), DT);
        }
        assert!(body.on_ground);
        assert_eq!(body.pos.y, SKY_HEIGHT - PLAYER_HEIGHT);
    }

    #[test]
    fn mined_floor_drops_the_body_to_the_next_solid_row() {
        // column 2 is hollow down to row 3
        let grid = TileGrid::from_fn(6, GRID_COLS, |row, col| {
            if col == 2 && row < 3 { BlockKind::Air } else { STONE }
        });
        let mut body = PlayerBody {
            pos: Vec2::new(280.0, SKY_HEIGHT - PLAYER_HEIGHT),
            vertical_velocity: 0.0,
            on_ground: true,
            facing: Facing::Right,
        };
        body.refresh_support(&grid);
        assert!(!body.on_ground);

        for _ in 0..300 {
            body.step(&grid, MoveIntent::default(), DT);
        }
        assert!(body.on_ground);
        assert_eq!(body.pos.y, top_of(3) - PLAYER_HEIGHT);
        assert_eq!(body.pos.x, 280.0);
    }

    #[test]
    fn ceiling_stops_a_jump() {
        // a single open row (2) in column 2, solid above and below
        let grid = TileGrid::from_fn(6, GRID_COLS, |row, col| {
            if col == 2 && row == 2 { BlockKind::Air } else { STONE }
        });
        let mut body = PlayerBody::standing_at(&grid, 280.0);
        body.pos.y = top_of(3) - PLAYER_HEIGHT;
        body.on_ground = true;

        let ceiling = top_of(2) - COLL_INSET_TOP;
        body.step(&grid, MoveIntent { jump: true, ..default() }, DT);
        let mut bumped = false;
        for _ in 0..120 {
            body.step(&grid, MoveIntent::default(), DT);
            assert!(body.pos.y >= ceiling - 1e-3);
            bumped |= body.pos.y == ceiling;
        }
        assert!(bumped);
        assert!(body.on_ground);
        assert_eq!(body.pos.y, top_of(3) - PLAYER_HEIGHT);
    }

    #[test]
    fn walls_push_the_body_back_out() {
        // corridor on row 1 spanning columns 0..=3, solid everywhere else
        let grid = TileGrid::from_fn(6, GRID_COLS, |row, col| {
            if row == 1 && col <= 3 { BlockKind::Air } else { STONE }
        });
        let mut body = PlayerBody::standing_at(&grid, 430.0);
        body.pos.y = top_of(2) - PLAYER_HEIGHT;
        body.on_ground = true;

        let stop = 4.0 * TILE_SIZE - PLAYER_WIDTH + COLL_INSET_X;
        for _ in 0..30 {
            body.step(&grid, MoveIntent { right: true, ..default() }, DT);
            assert!(body.pos.x <= stop + 1e-3);
        }
        assert_eq!(body.pos.x, stop);
        assert_eq!(body.facing, Facing::Right);
    }

    #[test]
    fn world_edges_clamp_x() {
        let grid = flat(6, GRID_COLS);
        let mut body = PlayerBody::standing_at(&grid, WORLD_RIGHT - 1.0);
        for _ in 0..30 {
            body.step(&grid, MoveIntent { right: true, ..default() }, DT);
        }
        assert_eq!(body.pos.x, WORLD_RIGHT);

        let mut body = PlayerBody::standing_at(&grid, 2.0);
        for _ in 0..30 {
            body.step(&grid, MoveIntent { left: true, ..default() }, DT);
        }
        assert_eq!(body.pos.x, WORLD_LEFT);
        assert_eq!(body.facing, Facing::Left);
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let grid = flat(6, GRID_COLS);
        let mut body = PlayerBody::standing_at(&grid, 300.0);
        let both = MoveIntent { left: true, right: true, jump: false };
        body.step(&grid, both, DT);
        assert_eq!(body.pos.x, 300.0);
    }

    #[test]
    fn walking_off_a_ledge_starts_a_fall() {
        let grid = TileGrid::from_fn(6, GRID_COLS, |_, col| {
            if col >= 5 { BlockKind::Air } else { STONE }
        });
        let mut body = PlayerBody::standing_at(&grid, 560.0);
        for _ in 0..20 {
            body.step(&grid, MoveIntent { right: true, ..default() }, DT);
        }
        assert!(!body.on_ground);
        assert!(body.pos.y > SKY_HEIGHT - PLAYER_HEIGHT);
    }

    #[test]
    fn mined_out_bottom_row_is_a_floor() {
        // column 2 open all the way down
        let grid = TileGrid::from_fn(6, GRID_COLS, |_, col| {
            if col == 2 { BlockKind::Air } else { STONE }
        });
        let mut body = PlayerBody {
            pos: Vec2::new(280.0, SKY_HEIGHT - PLAYER_HEIGHT),
            vertical_velocity: 0.0,
            on_ground: false,
            facing: Facing::Right,
        };
        for _ in 0..600 {
            body.step(&grid, MoveIntent::default(), DT);
        }
        assert_eq!(body.pos.y, grid.fallback_ground() - PLAYER_HEIGHT);
        assert_eq!(body.vertical_velocity, 0.0);
        assert!(body.on_ground);

        // and it can still jump off it
        body.step(&grid, MoveIntent { jump: true, ..default() }, DT);
        assert!(body.vertical_velocity < 0.0);
    }

    #[test]
    fn support_check_looks_under_the_feet_not_at_the_surface() {
        // tunnel on row 1 over column 2 whose floor (row 2) is gone
        let grid = TileGrid::from_fn(6, GRID_COLS, |row, col| {
            if col == 2 && (row == 1 || row == 2) { BlockKind::Air } else { STONE }
        });
        let mut body = PlayerBody {
            pos: Vec2::new(280.0, top_of(2) - PLAYER_HEIGHT),
            vertical_velocity: 0.0,
            on_ground: true,
            facing: Facing::Right,
        };
        body.refresh_support(&grid);
        assert!(!body.on_ground);

        let floored = TileGrid::from_fn(6, GRID_COLS, |row, col| {
            if col == 2 && row == 1 { BlockKind::Air } else { STONE }
        });
        body.on_ground = true;
        body.refresh_support(&floored);
        assert!(body.on_ground);
    }

    #[test]
    fn swings_target_neighbouring_cells() {
        let grid = flat(6, GRID_COLS);
        let body = PlayerBody::standing_at(&grid, 280.0);
        assert_eq!(body.target_cell(MineDirection::Down), Cell::new(0, 2));
        assert_eq!(body.target_cell(MineDirection::Right), Cell::new(0, 3));
        assert_eq!(body.target_cell(MineDirection::Left), Cell::new(0, 1));
        assert_eq!(body.target_cell(MineDirection::Up), Cell::new(-1, 2));
    }

    #[test]
    fn shop_door_is_on_the_surface_at_the_right_edge() {
        let grid = flat(6, GRID_COLS);
        let mut body = PlayerBody::standing_at(&grid, SHOP_TRIGGER_X);
        assert!(body.at_shop_door());
        body.pos.y += TILE_SIZE;
        assert!(!body.at_shop_door());
    }
}
