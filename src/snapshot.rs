//! read‑only view of a session after a tick, plus the shop rows for the
//! tab that is open

use crate::economy::{EconomyStore, Skin};
use crate::player::PlayerBody;
use crate::session::{Flash, GameEvent, GameSession, GameState, ShopTab};
use crate::terrain::{Cell, Ore, OreTable, TileGrid};
use crate::tools::{ToolKind, ToolSystem, UpgradeTrack, UNLIMITED};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolView {
    pub kind: ToolKind,
    /// (left, full) for tools that wear out
    pub durability: Option<(u32, u32)>,
    pub dynamite_stock: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SellRow {
    pub ore: Ore,
    pub count: u32,
    pub price: u32,
}

impl SellRow {
    pub fn value(&self) -> u32 {
        self.count * self.price
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeRow {
    pub track: UpgradeTrack,
    pub level: u8,
    /// `None` once maxed
    pub next_cost: Option<u32>,
    pub affordable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolRow {
    pub kind: ToolKind,
    pub price: u32,
    pub owned: bool,
    pub equipped: bool,
    pub durability: Option<u32>,
    pub affordable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkinRow {
    pub skin: Skin,
    pub price: u32,
    pub owned: bool,
    pub equipped: bool,
    pub affordable: bool,
}

/// rows of the open tab; upgrades stay locked until a pickaxe is owned
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShopView {
    Sell(Vec<SellRow>),
    Upgrades(Option<Vec<UpgradeRow>>),
    Tools(Vec<ToolRow>),
    Skins(Vec<SkinRow>),
}

impl ShopView {
    pub fn tab(&self) -> ShopTab {
        match self {
            ShopView::Sell(_) => ShopTab::Sell,
            ShopView::Upgrades(_) => ShopTab::Upgrades,
            ShopView::Tools(_) => ShopTab::Tools,
            ShopView::Skins(_) => ShopTab::Skins,
        }
    }

    fn build(tab: ShopTab, economy: &EconomyStore, tools: &ToolSystem) -> Self {
        let coins = economy.coins();
        match tab {
            ShopTab::Sell => ShopView::Sell(
                economy
                    .inventory()
                    .iter()
                    .map(|(ore, count)| SellRow { ore, count, price: ore.price() })
                    .collect(),
            ),
            ShopTab::Upgrades => ShopView::Upgrades(tools.owns(ToolKind::Pickaxe).then(|| {
                UpgradeTrack::ALL
                    .into_iter()
                    .map(|track| {
                        let level = tools.upgrades()[track];
                        let next_cost = track.next_cost(level);
                        UpgradeRow {
                            track,
                            level,
                            next_cost,
                            affordable: next_cost.is_some_and(|c| c <= coins),
                        }
                    })
                    .collect()
            })),
            ShopTab::Tools => ShopView::Tools(
                ToolKind::SHOP
                    .into_iter()
                    .map(|kind| {
                        let price = kind.def().price;
                        ToolRow {
                            kind,
                            price,
                            owned: tools.owns(kind),
                            equipped: tools.active() == kind,
                            durability: tools.durability(kind),
                            affordable: price <= coins,
                        }
                    })
                    .collect(),
            ),
            ShopTab::Skins => ShopView::Skins(
                Skin::ALL
                    .into_iter()
                    .map(|skin| SkinRow {
                        skin,
                        price: skin.price(),
                        owned: economy.owns_skin(skin),
                        equipped: economy.equipped_skin() == Some(skin),
                        affordable: skin.price() <= coins,
                    })
                    .collect(),
            ),
        }
    }
}

/// everything a presentation layer needs to draw one frame
#[derive(Clone, Debug)]
pub struct Snapshot<'a> {
    pub state: GameState,
    pub grid: &'a TileGrid,
    pub player: &'a PlayerBody,
    /// cell a swing would hit, while an arrow is held
    pub target: Option<Cell>,
    pub skin: Option<Skin>,
    pub inventory: &'a OreTable<u32>,
    pub coins: u32,
    pub tool: ToolView,
    pub fossils_found: usize,
    /// `Some` only while the shop is open
    pub shop: Option<ShopView>,
    pub flash: Option<&'a Flash>,
    pub events: &'a [GameEvent],
    pub quit_requested: bool,
}

pub(crate) fn capture(session: &GameSession) -> Snapshot<'_> {
    let tools = session.tools();
    let economy = session.economy();
    let kind = tools.active();
    let full = kind.def().base_durability;
    let durability = tools
        .durability(kind)
        .filter(|_| full < UNLIMITED)
        .map(|left| (left, full));

    Snapshot {
        state: session.state(),
        grid: session.grid(),
        player: session.player(),
        target: session.aimed_cell(),
        skin: economy.equipped_skin(),
        inventory: economy.inventory(),
        coins: economy.coins(),
        tool: ToolView { kind, durability, dynamite_stock: tools.dynamite_stock() },
        fossils_found: session.fossils().found(),
        shop: (session.state() == GameState::Shop)
            .then(|| ShopView::build(session.shop_tab(), economy, tools)),
        flash: session.flash(),
        events: session.events(),
        quit_requested: session.quit_requested(),
    }
}
