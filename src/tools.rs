//! tool catalogue, pickaxe upgrades & durability bookkeeping

use std::ops::Index;

use crate::constants::*;
use crate::economy::ShopError;
use crate::terrain::BlockKind;

/* ===========================================================
   catalogue
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Fists,
    Pickaxe,
    Dynamite,
    Radar,
    Drill,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolDef {
    pub label: &'static str,
    pub description: &'static str,
    pub damage: i32,
    pub base_durability: u32,
    pub fortune_mult: f32,
    pub mine_radius: i32,
    pub price: u32,
}

/// "never runs out" in practice; fists are additionally never drained
pub(crate) const UNLIMITED: u32 = 999_999;

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Fists,
        ToolKind::Pickaxe,
        ToolKind::Dynamite,
        ToolKind::Radar,
        ToolKind::Drill,
    ];

    /// everything except fists, in shop order
    pub const SHOP: [ToolKind; 4] = [
        ToolKind::Pickaxe,
        ToolKind::Dynamite,
        ToolKind::Radar,
        ToolKind::Drill,
    ];

    pub const fn def(self) -> ToolDef {
        match self {
            ToolKind::Fists => ToolDef {
                label: "Fists",
                description: "Your bare hands. Slow but free.",
                damage: 1,
                base_durability: UNLIMITED,
                fortune_mult: 1.0,
                mine_radius: 0,
                price: 0,
            },
            ToolKind::Pickaxe => ToolDef {
                label: "Pickaxe",
                description: "Mines faster. Can be upgraded.",
                damage: 2,
                base_durability: 30,
                fortune_mult: 1.0,
                mine_radius: 0,
                price: 40,
            },
            ToolKind::Dynamite => ToolDef {
                label: "Dynamite",
                description: "One-use. Destroys 3x3 area.",
                damage: 999,
                base_durability: 1,
                fortune_mult: 1.0,
                mine_radius: 1,
                price: 25,
            },
            ToolKind::Radar => ToolDef {
                label: "Radar",
                description: "Reveals blocks around you.",
                damage: 1,
                base_durability: UNLIMITED,
                fortune_mult: 1.0,
                mine_radius: 0,
                price: 80,
            },
            ToolKind::Drill => ToolDef {
                label: "Drill",
                description: "High damage, mines more, faster.",
                damage: 4,
                base_durability: 50,
                fortune_mult: 1.5,
                mine_radius: 0,
                price: 150,
            },
        }
    }

    pub const fn label(self) -> &'static str {
        self.def().label
    }
}

/* ===========================================================
   pickaxe upgrades
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeTrack {
    Fortune,
    Efficiency,
    Unbreaking,
}

pub const FORTUNE_EFFECTS: [f32; 3]    = [1.5, 2.0, 3.0];
pub const EFFICIENCY_EFFECTS: [i32; 3] = [3, 4, 6];
pub const UNBREAKING_EFFECTS: [u32; 3] = [3, 2, 1];

impl UpgradeTrack {
    pub const ALL: [UpgradeTrack; 3] = [
        UpgradeTrack::Fortune,
        UpgradeTrack::Efficiency,
        UpgradeTrack::Unbreaking,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            UpgradeTrack::Fortune    => "Fortune",
            UpgradeTrack::Efficiency => "Efficiency",
            UpgradeTrack::Unbreaking => "Unbreaking",
        }
    }

    pub const fn costs(self) -> [u32; 3] {
        match self {
            UpgradeTrack::Fortune    => [30, 70, 140],
            UpgradeTrack::Efficiency => [25, 60, 120],
            UpgradeTrack::Unbreaking => [20, 50, 100],
        }
    }

    /// price of the level after `current`, none once maxed
    pub fn next_cost(self, current: u8) -> Option<u32> {
        self.costs().get(current as usize).copied()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpgradeLevels([u8; 3]);

impl Index<UpgradeTrack> for UpgradeLevels {
    type Output = u8;
    fn index(&self, track: UpgradeTrack) -> &u8 {
        &self.0[track as usize]
    }
}

/* ===========================================================
   effective stats
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectiveStats {
    pub damage: i32,
    pub fortune_mult: f32,
    pub mine_radius: i32,
    /// durability a pickaxe loses per broken block
    pub durability_cost: u32,
}

pub fn effective_stats(tool: ToolKind, upgrades: &UpgradeLevels) -> EffectiveStats {
    let def = tool.def();
    let mut stats = EffectiveStats {
        damage: def.damage,
        fortune_mult: def.fortune_mult,
        mine_radius: def.mine_radius,
        durability_cost: UNBREAKING_BASE_COST,
    };
    if tool != ToolKind::Pickaxe {
        return stats;
    }

    // level N uses effect slot N-1, level 0 keeps the base value
    let slot = |track: UpgradeTrack| (upgrades[track] as usize).checked_sub(1);
    if let Some(i) = slot(UpgradeTrack::Fortune) {
        stats.fortune_mult = FORTUNE_EFFECTS[i];
    }
    if let Some(i) = slot(UpgradeTrack::Efficiency) {
        stats.damage = EFFICIENCY_EFFECTS[i];
    }
    if let Some(i) = slot(UpgradeTrack::Unbreaking) {
        stats.durability_cost = UNBREAKING_EFFECTS[i];
    }
    stats
}

/* ===========================================================
   owned tools
   =========================================================== */
#[derive(Clone, Debug)]
pub struct ToolSystem {
    /// remaining durability per kind, `None` when not owned
    durability: [Option<u32>; 5],
    active: ToolKind,
    dynamite_stock: u32,
    upgrades: UpgradeLevels,
}

impl Default for ToolSystem {
    fn default() -> Self {
        let mut durability = [None; 5];
        durability[ToolKind::Fists as usize] = Some(ToolKind::Fists.def().base_durability);
        Self {
            durability,
            active: ToolKind::Fists,
            dynamite_stock: 0,
            upgrades: UpgradeLevels::default(),
        }
    }
}

impl ToolSystem {
    pub fn active(&self) -> ToolKind {
        self.active
    }

    pub fn owns(&self, kind: ToolKind) -> bool {
        self.durability[kind as usize].is_some()
    }

    pub fn durability(&self, kind: ToolKind) -> Option<u32> {
        self.durability[kind as usize]
    }

    pub fn dynamite_stock(&self) -> u32 {
        self.dynamite_stock
    }

    pub fn upgrades(&self) -> &UpgradeLevels {
        &self.upgrades
    }

    pub fn active_stats(&self) -> EffectiveStats {
        effective_stats(self.active, &self.upgrades)
    }

    pub fn equip(&mut self, kind: ToolKind) -> Result<(), ShopError> {
        if !self.owns(kind) {
            return Err(ShopError::NotOwned(kind));
        }
        self.active = kind;
        Ok(())
    }

    /// hand over a freshly bought tool and equip it; leaves state untouched
    /// on error so purchases can run it before debiting
    pub fn grant(&mut self, kind: ToolKind) -> Result<(), ShopError> {
        match kind {
            ToolKind::Fists => Err(ShopError::AlreadyOwned(kind)),
            ToolKind::Dynamite => {
                self.dynamite_stock += 1;
                if !self.owns(kind) {
                    self.durability[kind as usize] = Some(kind.def().base_durability);
                    self.active = kind;
                }
                Ok(())
            }
            _ if self.owns(kind) => Err(ShopError::AlreadyOwned(kind)),
            _ => {
                self.durability[kind as usize] = Some(kind.def().base_durability);
                self.active = kind;
                Ok(())
            }
        }
    }

    pub fn raise_upgrade(&mut self, track: UpgradeTrack) -> Result<u8, ShopError> {
        if !self.owns(ToolKind::Pickaxe) {
            return Err(ShopError::PickaxeRequired);
        }
        let level = &mut self.upgrades.0[track as usize];
        if *level >= MAX_UPGRADE_LEVEL {
            return Err(ShopError::MaxLevel(track));
        }
        *level += 1;
        Ok(*level)
    }

    /// wear the active tool after it broke `mined`; returns the tool if it
    /// broke as a result
    pub fn consume_durability(&mut self, mined: BlockKind) -> Option<ToolKind> {
        let kind = self.active;
        let cost = match kind {
            ToolKind::Fists => return None,
            ToolKind::Pickaxe => self.active_stats().durability_cost,
            _ => mined.hardness(),
        };
        let slot = self.durability[kind as usize].as_mut()?;
        *slot = slot.saturating_sub(cost);
        if *slot > 0 {
            return None;
        }
        self.break_tool(kind);
        Some(kind)
    }

    /// burn one stick of dynamite; returns how many are left
    pub fn spend_dynamite_charge(&mut self) -> u32 {
        self.break_tool(ToolKind::Dynamite);
        self.dynamite_stock
    }

    fn break_tool(&mut self, kind: ToolKind) {
        self.durability[kind as usize] = None;
        if kind == ToolKind::Dynamite {
            self.dynamite_stock = self.dynamite_stock.saturating_sub(1);
            if self.dynamite_stock > 0 {
                self.durability[kind as usize] = Some(kind.def().base_durability);
                self.active = kind;
                return;
            }
        }
        if self.active == kind {
            self.active = ToolKind::Fists;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Ore;

    const STONE: BlockKind = BlockKind::Ore(Ore::Stone);

    #[test]
    fn fists_never_wear_out() {
        let mut tools = ToolSystem::default();
        for _ in 0..1_000 {
            assert_eq!(tools.consume_durability(BlockKind::Ore(Ore::Ruby)), None);
        }
        assert_eq!(tools.durability(ToolKind::Fists), Some(999_999));
        assert_eq!(tools.active(), ToolKind::Fists);
    }

    #[test]
    fn pickaxe_stats_follow_upgrade_levels() {
        let mut tools = ToolSystem::default();
        tools.grant(ToolKind::Pickaxe).unwrap();
        let base = tools.active_stats();
        assert_eq!((base.damage, base.fortune_mult, base.durability_cost), (2, 1.0, 4));

        tools.raise_upgrade(UpgradeTrack::Fortune).unwrap();
        tools.raise_upgrade(UpgradeTrack::Fortune).unwrap();
        for _ in 0..3 {
            tools.raise_upgrade(UpgradeTrack::Efficiency).unwrap();
        }
        tools.raise_upgrade(UpgradeTrack::Unbreaking).unwrap();

        let stats = tools.active_stats();
        assert_eq!(stats.fortune_mult, 2.0);
        assert_eq!(stats.damage, 6);
        assert_eq!(stats.durability_cost, 3);
        assert_eq!(stats.mine_radius, 0);
    }

    #[test]
    fn upgrades_only_touch_the_pickaxe() {
        let mut upgrades = UpgradeLevels::default();
        upgrades.0 = [3, 3, 3];
        let drill = effective_stats(ToolKind::Drill, &upgrades);
        assert_eq!((drill.damage, drill.fortune_mult), (4, 1.5));
        let dynamite = effective_stats(ToolKind::Dynamite, &upgrades);
        assert_eq!(dynamite.mine_radius, 1);
    }

    #[test]
    fn pickaxe_breaks_on_eighth_block() {
        let mut tools = ToolSystem::default();
        tools.grant(ToolKind::Pickaxe).unwrap();
        for _ in 0..7 {
            assert_eq!(tools.consume_durability(STONE), None);
        }
        assert_eq!(tools.durability(ToolKind::Pickaxe), Some(2));
        assert_eq!(tools.consume_durability(STONE), Some(ToolKind::Pickaxe));
        assert!(!tools.owns(ToolKind::Pickaxe));
        assert_eq!(tools.active(), ToolKind::Fists);
    }

    #[test]
    fn other_tools_lose_block_hardness() {
        let mut tools = ToolSystem::default();
        tools.grant(ToolKind::Drill).unwrap();
        let ruby = BlockKind::Ore(Ore::Ruby);
        assert_eq!(tools.consume_durability(ruby), None);
        assert_eq!(tools.consume_durability(ruby), None);
        assert_eq!(tools.durability(ToolKind::Drill), Some(14));
        assert_eq!(tools.consume_durability(ruby), Some(ToolKind::Drill));
        assert_eq!(tools.active(), ToolKind::Fists);
    }

    #[test]
    fn dynamite_reequips_while_stock_remains() {
        let mut tools = ToolSystem::default();
        tools.grant(ToolKind::Dynamite).unwrap();
        tools.grant(ToolKind::Dynamite).unwrap();
        assert_eq!(tools.dynamite_stock(), 2);
        assert_eq!(tools.active(), ToolKind::Dynamite);

        assert_eq!(tools.spend_dynamite_charge(), 1);
        assert_eq!(tools.active(), ToolKind::Dynamite);
        assert!(tools.owns(ToolKind::Dynamite));

        assert_eq!(tools.spend_dynamite_charge(), 0);
        assert_eq!(tools.active(), ToolKind::Fists);
        assert!(!tools.owns(ToolKind::Dynamite));
    }

    #[test]
    fn grant_and_equip_validate_ownership() {
        let mut tools = ToolSystem::default();
        assert_eq!(tools.grant(ToolKind::Fists), Err(ShopError::AlreadyOwned(ToolKind::Fists)));
        assert_eq!(tools.equip(ToolKind::Drill), Err(ShopError::NotOwned(ToolKind::Drill)));

        tools.grant(ToolKind::Radar).unwrap();
        assert_eq!(tools.grant(ToolKind::Radar), Err(ShopError::AlreadyOwned(ToolKind::Radar)));
        tools.equip(ToolKind::Fists).unwrap();
        assert_eq!(tools.active(), ToolKind::Fists);
    }

    #[test]
    fn upgrades_need_a_pickaxe_and_stop_at_max() {
        let mut tools = ToolSystem::default();
        assert_eq!(
            tools.raise_upgrade(UpgradeTrack::Efficiency),
            Err(ShopError::PickaxeRequired)
        );
        tools.grant(ToolKind::Pickaxe).unwrap();
        assert_eq!(tools.raise_upgrade(UpgradeTrack::Unbreaking), Ok(1));
        assert_eq!(tools.raise_upgrade(UpgradeTrack::Unbreaking), Ok(2));
        assert_eq!(tools.raise_upgrade(UpgradeTrack::Unbreaking), Ok(3));
        assert_eq!(
            tools.raise_upgrade(UpgradeTrack::Unbreaking),
            Err(ShopError::MaxLevel(UpgradeTrack::Unbreaking))
        );
        assert_eq!(UpgradeTrack::Unbreaking.next_cost(3), None);
    }
}
