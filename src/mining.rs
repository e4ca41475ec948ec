//! mining: melee hits, dynamite blasts, ore yield & fossil collection

use rand::Rng;

use crate::constants::FOSSIL_COUNT;
use crate::economy::EconomyStore;
use crate::session::GameEvent;
use crate::terrain::{BlockKind, Cell, Fossil, TileGrid};
use crate::tools::{EffectiveStats, ToolSystem};

/* ===========================================================
   fossil progress
   =========================================================== */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FossilTracker {
    collected: [bool; FOSSIL_COUNT],
}

impl FossilTracker {
    /// returns how many distinct pieces are now found
    pub fn collect(&mut self, piece: Fossil) -> usize {
        self.collected[piece as usize] = true;
        self.found()
    }

    pub fn found(&self) -> usize {
        self.collected.iter().filter(|c| **c).count()
    }

    pub fn is_complete(&self) -> bool {
        self.collected.iter().all(|c| *c)
    }
}

/* ===========================================================
   yield
   =========================================================== */
/// floor(fortune) units plus one more with probability frac(fortune),
/// never less than one
pub fn roll_yield(fortune: f32, rng: &mut impl Rng) -> u32 {
    let whole = fortune.floor();
    let frac = fortune - whole;
    let bonus = frac > 0.0 && rng.gen_bool(f64::from(frac));
    whole.max(1.0) as u32 + u32::from(bonus)
}

/// blasts don't roll for the fractional part
pub fn blast_yield(fortune: f32) -> u32 {
    fortune.floor().max(1.0) as u32
}

/* ===========================================================
   mine
   =========================================================== */
/// swing the active tool at `target`; air and out‑of‑grid targets are
/// silently ignored
pub fn mine(
    grid: &mut TileGrid,
    tools: &mut ToolSystem,
    economy: &mut EconomyStore,
    fossils: &mut FossilTracker,
    target: Cell,
    rng: &mut impl Rng,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !grid.is_solid(target) {
        return events;
    }

    let stats = tools.active_stats();
    if stats.mine_radius > 0 {
        blast(grid, economy, target, stats, &mut events);
        let remaining = tools.spend_dynamite_charge();
        events.push(GameEvent::DynamiteSpent { remaining });
    } else {
        strike(grid, tools, economy, fossils, target, stats, rng, &mut events);
    }
    events
}

/// flattens the whole square regardless of hardness; fossils caught in it
/// are lost, not collected
fn blast(
    grid: &mut TileGrid,
    economy: &mut EconomyStore,
    center: Cell,
    stats: EffectiveStats,
    events: &mut Vec<GameEvent>,
) {
    let r = stats.mine_radius;
    let per_ore = blast_yield(stats.fortune_mult);
    for d_row in -r..=r {
        for d_col in -r..=r {
            let cell = center.offset(d_row, d_col);
            let Some(kind) = clear(grid, cell) else { continue };
            events.push(GameEvent::BlockBroken { cell, kind });
            match kind {
                BlockKind::Ore(ore) => {
                    economy.add_ore(ore, per_ore);
                    events.push(GameEvent::OreCollected { ore, amount: per_ore });
                }
                BlockKind::Fossil(piece) => events.push(GameEvent::FossilDestroyed(piece)),
                _ => {}
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn strike(
    grid: &mut TileGrid,
    tools: &mut ToolSystem,
    economy: &mut EconomyStore,
    fossils: &mut FossilTracker,
    cell: Cell,
    stats: EffectiveStats,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let Some(block) = grid.get_mut(cell) else { return };
    block.hp -= stats.damage;
    let (hp, max_hp) = (block.hp, block.max_hp);
    if hp > 0 {
        grid.mark_changed(cell);
        events.push(GameEvent::BlockDamaged { cell, hp, max_hp });
        return;
    }

    let Some(kind) = clear(grid, cell) else { return };
    events.push(GameEvent::BlockBroken { cell, kind });
    match kind {
        BlockKind::Fossil(piece) => {
            let found = fossils.collect(piece);
            events.push(GameEvent::FossilFound { piece, found });
            if fossils.is_complete() {
                events.push(GameEvent::FossilComplete);
            }
        }
        BlockKind::Ore(ore) => {
            let amount = roll_yield(stats.fortune_mult, rng);
            economy.add_ore(ore, amount);
            events.push(GameEvent::OreCollected { ore, amount });
        }
        _ => {}
    }

    if let Some(tool) = tools.consume_durability(kind) {
        events.push(GameEvent::ToolBroke(tool));
    }
}

/// turn a solid cell into air, returning what was there
fn clear(grid: &mut TileGrid, cell: Cell) -> Option<BlockKind> {
    let block = grid.get_mut(cell)?;
    if block.is_air() {
        return None;
    }
    let kind = block.kind;
    block.kind = BlockKind::Air;
    block.hp = 0;
    grid.mark_changed(cell);
    Some(kind)
}
