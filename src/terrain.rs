//! tile grid: block kinds, depth‑banded generation & spatial queries
//!
//! World coordinates are screen‑style: x grows right, y grows *down*, and
//! grid row 0 starts right under the sky band (`SKY_HEIGHT`).

use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use bevy::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::index::sample;
use rand::Rng;

use crate::constants::*;

/// distance in from each footprint edge when probing for the ground column
const GROUND_PROBE_INSET: f32 = 4.0;

/// helper conversions (row‑0 = first row under the sky)
pub fn row_at(world_y: f32) -> i32 {
    ((world_y - SKY_HEIGHT) / TILE_SIZE).floor() as i32
}
pub fn col_at(world_x: f32) -> i32 {
    (world_x / TILE_SIZE).floor() as i32
}

/* ===========================================================
   ores
   =========================================================== */
/// every block kind that can end up in the inventory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ore {
    Soil,
    Stone,
    Copper,
    Gold,
    Diamond,
    Ruby,
}

impl Ore {
    pub const ALL: [Ore; 6] = [
        Ore::Soil,
        Ore::Stone,
        Ore::Copper,
        Ore::Gold,
        Ore::Diamond,
        Ore::Ruby,
    ];

    /// coins paid per unit in the shop
    pub const fn price(self) -> u32 {
        match self {
            Ore::Soil    => 1,
            Ore::Stone   => 2,
            Ore::Copper  => 5,
            Ore::Gold    => 15,
            Ore::Diamond => 40,
            Ore::Ruby    => 80,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Ore::Soil    => "Soil",
            Ore::Stone   => "Stone",
            Ore::Copper  => "Copper",
            Ore::Gold    => "Gold",
            Ore::Diamond => "Diamond",
            Ore::Ruby    => "Ruby",
        }
    }
}

/// fixed‑size table with one slot per ore
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OreTable<T>(pub [T; 6]);

impl<T: Copy> OreTable<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Ore, T)> + '_ {
        Ore::ALL.into_iter().map(move |ore| (ore, self[ore]))
    }
}

impl<T> Index<Ore> for OreTable<T> {
    type Output = T;
    fn index(&self, ore: Ore) -> &T {
        &self.0[ore as usize]
    }
}

impl<T> IndexMut<Ore> for OreTable<T> {
    fn index_mut(&mut self, ore: Ore) -> &mut T {
        &mut self.0[ore as usize]
    }
}

/* ===========================================================
   fossils
   =========================================================== */
/// the seven unique skeleton pieces buried in every world
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fossil {
    Head,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    Tail,
    Ribs,
}

impl Fossil {
    pub const ALL: [Fossil; FOSSIL_COUNT] = [
        Fossil::Head,
        Fossil::LeftArm,
        Fossil::RightArm,
        Fossil::LeftLeg,
        Fossil::RightLeg,
        Fossil::Tail,
        Fossil::Ribs,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Fossil::Head     => "skull",
            Fossil::LeftArm  => "left arm",
            Fossil::RightArm => "right arm",
            Fossil::LeftLeg  => "left leg",
            Fossil::RightLeg => "right leg",
            Fossil::Tail     => "tail",
            Fossil::Ribs     => "ribcage",
        }
    }
}

/* ===========================================================
   blocks
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Air,
    Grass,
    Ore(Ore),
    Fossil(Fossil),
}

impl BlockKind {
    pub const fn label(self) -> &'static str {
        match self {
            BlockKind::Air => "Air",
            BlockKind::Grass => "Grass",
            BlockKind::Ore(ore) => ore.label(),
            BlockKind::Fossil(_) => "Fossil",
        }
    }

    pub const fn max_hp(self) -> i32 {
        match self {
            BlockKind::Air                  => 0,
            BlockKind::Grass                => 2,
            BlockKind::Ore(Ore::Soil)       => 3,
            BlockKind::Ore(Ore::Stone)      => 6,
            BlockKind::Ore(Ore::Copper)     => 10,
            BlockKind::Ore(Ore::Gold)       => 16,
            BlockKind::Ore(Ore::Diamond)    => 26,
            BlockKind::Ore(Ore::Ruby)       => 40,
            BlockKind::Fossil(_)            => FOSSIL_HP,
        }
    }

    /// durability drained from non‑pickaxe tools when this block breaks
    pub const fn hardness(self) -> u32 {
        match self {
            BlockKind::Ore(Ore::Stone)   => 3,
            BlockKind::Ore(Ore::Copper)  => 5,
            BlockKind::Ore(Ore::Gold)    => 7,
            BlockKind::Ore(Ore::Diamond) => 12,
            BlockKind::Ore(Ore::Ruby)    => 18,
            _                            => 1,
        }
    }

    pub const fn is_solid(self) -> bool {
        !matches!(self, BlockKind::Air)
    }

    pub const fn ore(self) -> Option<Ore> {
        match self {
            BlockKind::Ore(ore) => Some(ore),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub row: usize,
    pub col: usize,
    pub kind: BlockKind,
    pub hp: i32,
    pub max_hp: i32,
}

impl Block {
    pub fn new(row: usize, col: usize, kind: BlockKind) -> Self {
        let max_hp = kind.max_hp();
        Self { row, col, kind, hp: max_hp, max_hp }
    }

    /// top‑left corner in world space
    pub fn x(&self) -> f32 {
        self.col as f32 * TILE_SIZE
    }
    pub fn y(&self) -> f32 {
        SKY_HEIGHT + self.row as f32 * TILE_SIZE
    }

    pub fn is_air(&self) -> bool {
        self.kind == BlockKind::Air
    }

    /// 0.0 = pristine, approaching 1.0 = about to break
    pub fn damage_fraction(&self) -> f32 {
        if self.is_air() || self.max_hp <= 0 {
            return 0.0;
        }
        (1.0 - self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    /// crack overlay stage, 0 when undamaged and 1..=4 afterwards
    pub fn crack_stage(&self) -> u8 {
        if self.is_air() || self.hp >= self.max_hp {
            return 0;
        }
        ((self.damage_fraction() * 4.0).floor() as u8 + 1).min(4)
    }
}

/// signed so edge‑of‑world probes can step outside the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self { row: self.row.saturating_add(d_row), col: self.col.saturating_add(d_col) }
    }
}

/* ===========================================================
   depth bands
   =========================================================== */
/// rows with an index below `max_row` draw their kind from `choices`
#[derive(Clone, Copy, Debug)]
pub struct DepthBand {
    pub max_row: usize,
    pub choices: &'static [(BlockKind, u32)],
}

pub const DEPTH_BANDS: [DepthBand; 7] = [
    DepthBand { max_row: 1,   choices: &[(BlockKind::Grass, 100)] },
    DepthBand {
        max_row: 5,
        choices: &[(BlockKind::Ore(Ore::Soil), 90), (BlockKind::Ore(Ore::Stone), 10)],
    },
    DepthBand {
        max_row: 10,
        choices: &[(BlockKind::Ore(Ore::Soil), 60), (BlockKind::Ore(Ore::Stone), 40)],
    },
    DepthBand {
        max_row: 15,
        choices: &[(BlockKind::Ore(Ore::Stone), 70), (BlockKind::Ore(Ore::Copper), 30)],
    },
    DepthBand {
        max_row: 20,
        choices: &[
            (BlockKind::Ore(Ore::Stone), 40),
            (BlockKind::Ore(Ore::Copper), 40),
            (BlockKind::Ore(Ore::Gold), 20),
        ],
    },
    DepthBand {
        max_row: 25,
        choices: &[
            (BlockKind::Ore(Ore::Stone), 20),
            (BlockKind::Ore(Ore::Copper), 20),
            (BlockKind::Ore(Ore::Gold), 40),
            (BlockKind::Ore(Ore::Diamond), 20),
        ],
    },
    DepthBand {
        max_row: 999,
        choices: &[
            (BlockKind::Ore(Ore::Stone), 10),
            (BlockKind::Ore(Ore::Gold), 20),
            (BlockKind::Ore(Ore::Diamond), 40),
            (BlockKind::Ore(Ore::Ruby), 30),
        ],
    },
];

/// used when no band covers a row or a band's weights are unusable
pub const FALLBACK_KIND: BlockKind = BlockKind::Ore(Ore::Stone);

pub fn band_for(row: usize, bands: &[DepthBand]) -> Option<&DepthBand> {
    bands.iter().find(|band| row < band.max_row)
}

pub fn pick_block_kind(row: usize, bands: &[DepthBand], rng: &mut impl Rng) -> BlockKind {
    let Some(band) = band_for(row, bands) else { return FALLBACK_KIND };
    match WeightedIndex::new(band.choices.iter().map(|(_, w)| *w)) {
        Ok(dist) => band.choices[dist.sample(rng)].0,
        Err(_) => FALLBACK_KIND,
    }
}

/* ===========================================================
   grid
   =========================================================== */
#[derive(Clone, Debug)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    blocks: Vec<Block>,
    changed: VecDeque<Cell>,
}

impl TileGrid {
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut kind_at: impl FnMut(usize, usize) -> BlockKind,
    ) -> Self {
        let mut blocks = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                blocks.push(Block::new(row, col, kind_at(row, col)));
            }
        }
        Self { rows, cols, blocks, changed: VecDeque::new() }
    }

    /// grass on top, banded ores below, fossils scattered at depth
    pub fn generate(
        rows: usize,
        cols: usize,
        bands: &[DepthBand],
        fossil_count: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let mut grid = Self::from_fn(rows, cols, |row, _| {
            if row == 0 {
                BlockKind::Grass
            } else {
                pick_block_kind(row, bands, &mut *rng)
            }
        });

        let candidates = rows.saturating_sub(FOSSIL_MIN_ROW) * cols;
        let count = fossil_count.min(Fossil::ALL.len()).min(candidates);
        for (slot, fossil) in sample(rng, candidates, count).into_iter().zip(Fossil::ALL) {
            let (row, col) = (FOSSIL_MIN_ROW + slot / cols, slot % cols);
            let idx = grid.idx(row, col);
            grid.blocks[idx] = Block::new(row, col, BlockKind::Fossil(fossil));
            debug!("buried {} at row {row}, col {col}", fossil.label());
        }

        info!("generated {rows}x{cols} grid with {count} fossil pieces");
        grid
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn checked_idx(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(self.idx(cell.row as usize, cell.col as usize))
        } else {
            None
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.rows
            && (cell.col as usize) < self.cols
    }

    pub fn get(&self, cell: Cell) -> Option<&Block> {
        self.checked_idx(cell).map(|i| &self.blocks[i])
    }

    /// hp & kind are only ever rewritten by the mining code
    pub(crate) fn get_mut(&mut self, cell: Cell) -> Option<&mut Block> {
        self.checked_idx(cell).map(|i| &mut self.blocks[i])
    }

    pub fn cell_at(world_x: f32, world_y: f32) -> Cell {
        Cell::new(row_at(world_y), col_at(world_x))
    }

    pub fn block_at(&self, world_x: f32, world_y: f32) -> Option<&Block> {
        self.get(Self::cell_at(world_x, world_y))
    }

    /// out‑of‑bounds is open space, the world edge clamp keeps the player in
    pub fn is_solid(&self, cell: Cell) -> bool {
        self.get(cell).is_some_and(|b| b.kind.is_solid())
    }

    /// y just below the last row, used when a column has no ground at all
    pub fn fallback_ground(&self) -> f32 {
        SKY_HEIGHT + self.rows as f32 * TILE_SIZE
    }

    /// top‑left y at which a player at `player_x` stands on the highest
    /// surface under either edge of its footprint
    pub fn ground_y(&self, player_x: f32) -> f32 {
        let mut best = self.fallback_ground();
        for probe_x in [
            player_x + GROUND_PROBE_INSET,
            player_x + PLAYER_WIDTH - GROUND_PROBE_INSET,
        ] {
            let col = col_at(probe_x);
            if col < 0 || col as usize >= self.cols {
                continue;
            }
            let surface = (0..self.rows)
                .map(|row| &self.blocks[self.idx(row, col as usize)])
                .find(|b| !b.is_air());
            if let Some(block) = surface {
                best = best.min(block.y() - PLAYER_HEIGHT);
            }
        }
        best
    }

    /* ---------- change tracking for the sprite layer ---------- */
    pub(crate) fn mark_changed(&mut self, cell: Cell) {
        if !self.changed.contains(&cell) {
            self.changed.push_back(cell);
        }
    }

    pub fn changed_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.changed.iter().copied()
    }

    pub(crate) fn clear_changes(&mut self) {
        self.changed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn generated(seed: u64) -> TileGrid {
        let mut rng = StdRng::seed_from_u64(seed);
        TileGrid::generate(GRID_ROWS, GRID_COLS, &DEPTH_BANDS, FOSSIL_COUNT, &mut rng)
    }

    #[test]
    fn rows_follow_their_depth_band() {
        for seed in 0..8 {
            let grid = generated(seed);
            for block in grid.blocks() {
                if matches!(block.kind, BlockKind::Fossil(_)) {
                    continue;
                }
                if block.row == 0 {
                    assert_eq!(block.kind, BlockKind::Grass);
                    continue;
                }
                let band = band_for(block.row, &DEPTH_BANDS).expect("band");
                assert!(
                    band.choices.iter().any(|(kind, _)| *kind == block.kind),
                    "{:?} not allowed on row {}",
                    block.kind,
                    block.row
                );
            }
        }
    }

    #[test]
    fn seven_distinct_fossils_buried_at_depth() {
        for seed in 0..8 {
            let grid = generated(seed);
            let fossils: Vec<_> = grid
                .blocks()
                .iter()
                .filter_map(|b| match b.kind {
                    BlockKind::Fossil(f) => Some((f, b.row, b.hp, b.max_hp)),
                    _ => None,
                })
                .collect();
            assert_eq!(fossils.len(), FOSSIL_COUNT);
            let ids: HashSet<_> = fossils.iter().map(|(f, ..)| *f).collect();
            assert_eq!(ids.len(), FOSSIL_COUNT);
            for (_, row, hp, max_hp) in fossils {
                assert!(row >= FOSSIL_MIN_ROW);
                assert_eq!((hp, max_hp), (FOSSIL_HP, FOSSIL_HP));
            }
        }
    }

    #[test]
    fn shallow_grid_gets_no_fossils() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = TileGrid::generate(3, 4, &DEPTH_BANDS, FOSSIL_COUNT, &mut rng);
        assert!(grid.blocks().iter().all(|b| !matches!(b.kind, BlockKind::Fossil(_))));
    }

    #[test]
    fn missing_band_falls_back_to_stone() {
        let mut rng = StdRng::seed_from_u64(1);
        let bands = [DepthBand { max_row: 2, choices: &[(BlockKind::Grass, 1)] }];
        assert_eq!(pick_block_kind(5, &bands, &mut rng), FALLBACK_KIND);

        let zero = [DepthBand { max_row: 10, choices: &[(BlockKind::Grass, 0)] }];
        assert_eq!(pick_block_kind(5, &zero, &mut rng), FALLBACK_KIND);
    }

    #[test]
    fn block_at_maps_world_to_cell() {
        let grid = TileGrid::from_fn(4, 3, |_, _| BlockKind::Ore(Ore::Soil));
        let b = grid.block_at(TILE_SIZE * 2.0 + 1.0, SKY_HEIGHT + TILE_SIZE + 5.0).unwrap();
        assert_eq!((b.row, b.col), (1, 2));

        assert!(grid.block_at(-1.0, SKY_HEIGHT + 1.0).is_none());
        assert!(grid.block_at(10.0, SKY_HEIGHT - 1.0).is_none());
        assert!(grid.block_at(TILE_SIZE * 3.0, SKY_HEIGHT + 1.0).is_none());
        assert!(grid.block_at(10.0, SKY_HEIGHT + TILE_SIZE * 4.0).is_none());
    }

    #[test]
    fn ground_y_takes_the_higher_column() {
        // col 0 open for two rows, col 1 open for one
        let grid = TileGrid::from_fn(6, 3, |row, col| match (row, col) {
            (0 | 1, 0) | (0, 1) => BlockKind::Air,
            _ => BlockKind::Ore(Ore::Stone),
        });
        // probes land at x=104 (col 0) and x=181 (col 1)
        let y = grid.ground_y(100.0);
        assert_eq!(y, SKY_HEIGHT + TILE_SIZE - PLAYER_HEIGHT);
    }

    #[test]
    fn ground_y_falls_back_below_an_empty_column() {
        let grid = TileGrid::from_fn(5, 2, |_, _| BlockKind::Air);
        assert_eq!(grid.ground_y(10.0), grid.fallback_ground());
        assert_eq!(grid.ground_y(-500.0), grid.fallback_ground());
    }

    #[test]
    fn crack_stage_tracks_damage() {
        let mut block = Block::new(2, 0, BlockKind::Ore(Ore::Gold));
        assert_eq!(block.crack_stage(), 0);
        block.hp = 12;
        assert_eq!(block.crack_stage(), 2);
        block.hp = 1;
        assert_eq!(block.crack_stage(), 4);
        assert!((block.damage_fraction() - 15.0 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn offsets_stop_at_the_integer_edge() {
        let deep = Cell::new(i32::MAX, i32::MIN);
        assert_eq!(deep.offset(1, -1), deep);
        assert_eq!(Cell::new(3, 4).offset(-1, 2), Cell::new(2, 6));
    }
}
