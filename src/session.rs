//! one play session: owns every piece of simulation state and advances it
//! a frame at a time from the intents gathered by the input systems

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::*;
use crate::economy::{EconomyStore, ShopError, Skin};
use crate::mining::{self, FossilTracker};
use crate::player::{MineDirection, MoveIntent, PlayerBody};
use crate::snapshot::{self, Snapshot};
use crate::terrain::{BlockKind, Cell, Fossil, Ore, TileGrid, DEPTH_BANDS};
use crate::tools::{ToolKind, ToolSystem, UpgradeTrack};

/* ===========================================================
   inputs
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    /// arrow held; highlights the swing target
    Aim(MineDirection),
    Mine(MineDirection),
    OpenShop,
    CloseShop,
    SelectShopTab(ShopTab),
    EquipTool(ToolKind),
    BuyTool(ToolKind),
    BuySkin(Skin),
    ToggleSkin(Skin),
    SellOre(Ore),
    BuyUpgrade(UpgradeTrack),
    TeleportToSurface,
    Quit,
}

impl Intent {
    /// intents that spend or earn coins or change the loadout from the shop
    fn is_transaction(self) -> bool {
        matches!(
            self,
            Intent::EquipTool(_)
                | Intent::BuyTool(_)
                | Intent::BuySkin(_)
                | Intent::ToggleSkin(_)
                | Intent::SellOre(_)
                | Intent::BuyUpgrade(_)
        )
    }
}

/// intents collected by the input systems, drained once per tick
#[derive(Resource, Default, Debug)]
pub struct FrameIntents(Vec<Intent>);

impl FrameIntents {
    pub fn push(&mut self, intent: Intent) {
        self.0.push(intent);
    }

    pub fn take(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.0)
    }
}

/* ===========================================================
   state
   =========================================================== */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameState {
    #[default]
    Playing,
    Shop,
    FossilComplete,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShopTab {
    #[default]
    Sell,
    Upgrades,
    Tools,
    Skins,
}

impl ShopTab {
    pub const ALL: [ShopTab; 4] = [ShopTab::Sell, ShopTab::Upgrades, ShopTab::Tools, ShopTab::Skins];

    pub const fn label(self) -> &'static str {
        match self {
            ShopTab::Sell => "Sell",
            ShopTab::Upgrades => "Upgrades",
            ShopTab::Tools => "Tools",
            ShopTab::Skins => "Skins",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

/* ===========================================================
   outputs
   =========================================================== */
#[derive(Event, Clone, Debug, PartialEq)]
pub enum GameEvent {
    BlockDamaged { cell: Cell, hp: i32, max_hp: i32 },
    BlockBroken { cell: Cell, kind: BlockKind },
    OreCollected { ore: Ore, amount: u32 },
    ToolBroke(ToolKind),
    DynamiteSpent { remaining: u32 },
    FossilFound { piece: Fossil, found: usize },
    FossilDestroyed(Fossil),
    FossilComplete,
    Sold { ore: Ore, earned: u32 },
    ToolBought(ToolKind),
    UpgradeBought { track: UpgradeTrack, level: u8 },
    SkinBought(Skin),
    SkinChanged(Option<Skin>),
    ToolEquipped(ToolKind),
    Teleported,
    ShopOpened,
    ShopClosed,
    Rejected(ShopError),
}

impl GameEvent {
    /// status line shown to the player, with how long it stays up
    pub fn flash(&self) -> Option<(String, f32)> {
        let line = match self {
            GameEvent::Sold { earned, .. } => (format!("+{earned} coins!"), FLASH_DEFAULT),
            GameEvent::ToolBought(kind) => (format!("{} purchased!", kind.label()), FLASH_DEFAULT),
            GameEvent::UpgradeBought { track, level } => {
                (format!("{} {level} unlocked!", track.label()), FLASH_DEFAULT)
            }
            GameEvent::SkinBought(Skin::Santa) => {
                ("Santa skin unlocked! Ho ho ho!".to_string(), FLASH_DEFAULT)
            }
            GameEvent::Rejected(err) => (err.to_string(), FLASH_REJECT),
            GameEvent::ToolBroke(kind) => (format!("{} broke!", kind.label()), FLASH_EVENT),
            GameEvent::FossilFound { found, .. } => {
                (format!("Fossil piece found! ({found}/{FOSSIL_COUNT})"), FLASH_EVENT)
            }
            GameEvent::FossilDestroyed(piece) => {
                (format!("The blast shattered the {}!", piece.label()), FLASH_EVENT)
            }
            _ => return None,
        };
        Some(line)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Flash {
    pub text: String,
    ttl: f32,
    duration: f32,
}

impl Flash {
    fn new(text: String, duration: f32) -> Self {
        Self { text, ttl: duration, duration }
    }

    /// 1.0 when fresh, falling to 0.0 as it expires
    pub fn remaining(&self) -> f32 {
        (self.ttl / self.duration).clamp(0.0, 1.0)
    }
}

/* ===========================================================
   config
   =========================================================== */
#[derive(Resource, Clone, Debug)]
pub struct SessionConfig {
    pub rows: usize,
    pub cols: usize,
    pub fossil_count: usize,
    pub starting_coins: u32,
    /// fixed seed for reproducible worlds; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            fossil_count: FOSSIL_COUNT,
            starting_coins: STARTING_COINS,
            seed: None,
        }
    }
}

/* ===========================================================
   session
   =========================================================== */
#[derive(Resource)]
pub struct GameSession {
    grid: TileGrid,
    player: PlayerBody,
    tools: ToolSystem,
    economy: EconomyStore,
    fossils: FossilTracker,
    state: GameState,
    shop_tab: ShopTab,
    aim: Option<MineDirection>,
    flash: Option<Flash>,
    events: Vec<GameEvent>,
    rng: StdRng,
    quit_requested: bool,
}

impl GameSession {
    pub fn new(config: &SessionConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = TileGrid::generate(
            config.rows,
            config.cols,
            &DEPTH_BANDS,
            config.fossil_count,
            &mut rng,
        );
        Self::with_grid(grid, config.starting_coins, rng)
    }

    /// session over a hand‑built grid, spawned next to the shop
    pub fn with_grid(grid: TileGrid, coins: u32, rng: StdRng) -> Self {
        let player = PlayerBody::standing_at(&grid, SHOP_TRIGGER_X - PLAYER_WIDTH - 8.0);
        Self {
            grid,
            player,
            tools: ToolSystem::default(),
            economy: EconomyStore::new(coins),
            fossils: FossilTracker::default(),
            state: GameState::Playing,
            shop_tab: ShopTab::Sell,
            aim: None,
            flash: None,
            events: Vec::new(),
            rng,
            quit_requested: false,
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }
    pub fn player(&self) -> &PlayerBody {
        &self.player
    }
    pub fn tools(&self) -> &ToolSystem {
        &self.tools
    }
    pub fn economy(&self) -> &EconomyStore {
        &self.economy
    }
    pub fn fossils(&self) -> &FossilTracker {
        &self.fossils
    }
    pub fn state(&self) -> GameState {
        self.state
    }
    pub fn shop_tab(&self) -> ShopTab {
        self.shop_tab
    }
    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
    /// cell the held arrow points at, while playing
    pub fn aimed_cell(&self) -> Option<Cell> {
        self.aim.map(|dir| self.player.target_cell(dir))
    }
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// advance one frame and report what it looks like afterwards
    pub fn tick(&mut self, dt: f32, intents: &[Intent]) -> Snapshot<'_> {
        self.events.clear();
        self.aim = None;
        self.grid.clear_changes();
        self.age_flash(dt);

        if intents.contains(&Intent::Quit) {
            info!("quit requested");
            self.quit_requested = true;
        }

        match self.state {
            GameState::Playing => self.play_frame(dt, intents),
            GameState::Shop => self.shop_frame(intents),
            GameState::FossilComplete => {}
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        snapshot::capture(self)
    }

    /// what a shop hot‑key on `row` of the current tab would do
    pub fn shop_row_intent(&self, row: usize) -> Option<Intent> {
        let intent = match self.shop_tab {
            ShopTab::Sell => Intent::SellOre(*Ore::ALL.get(row)?),
            ShopTab::Upgrades => Intent::BuyUpgrade(*UpgradeTrack::ALL.get(row)?),
            ShopTab::Tools => {
                let kind = *ToolKind::SHOP.get(row)?;
                if self.tools.owns(kind) && kind != ToolKind::Dynamite {
                    Intent::EquipTool(kind)
                } else {
                    Intent::BuyTool(kind)
                }
            }
            ShopTab::Skins => {
                let skin = *Skin::ALL.get(row)?;
                if self.economy.owns_skin(skin) {
                    Intent::ToggleSkin(skin)
                } else {
                    Intent::BuySkin(skin)
                }
            }
        };
        Some(intent)
    }

    /* ---------- playing ---------- */
    fn play_frame(&mut self, dt: f32, intents: &[Intent]) {
        let movement = MoveIntent {
            left: intents.contains(&Intent::MoveLeft),
            right: intents.contains(&Intent::MoveRight),
            jump: intents.contains(&Intent::Jump),
        };

        for intent in intents {
            if let Intent::EquipTool(kind) = *intent {
                self.equip(kind);
            }
        }

        self.player.step(&self.grid, movement, dt);
        self.aim = intents.iter().find_map(|intent| match intent {
            Intent::Aim(dir) => Some(*dir),
            _ => None,
        });

        if self.player.at_shop_door() || intents.contains(&Intent::OpenShop) {
            self.aim = None;
            self.open_shop();
            return;
        }

        if intents.contains(&Intent::TeleportToSurface) {
            self.teleport_to_surface();
        }

        let swing = intents.iter().find_map(|intent| match intent {
            Intent::Mine(dir) => Some(*dir),
            _ => None,
        });
        if let Some(dir) = swing {
            let target = self.player.target_cell(dir);
            let events = mining::mine(
                &mut self.grid,
                &mut self.tools,
                &mut self.economy,
                &mut self.fossils,
                target,
                &mut self.rng,
            );
            for event in events {
                self.emit(event);
            }
            self.player.refresh_support(&self.grid);
        }
    }

    fn equip(&mut self, kind: ToolKind) {
        let event = match self.tools.equip(kind) {
            Ok(()) => GameEvent::ToolEquipped(kind),
            Err(err) => GameEvent::Rejected(err),
        };
        self.emit(event);
    }

    fn teleport_to_surface(&mut self) {
        self.player.pos = Vec2::new(SHOP_TRIGGER_X - TELEPORT_OFFSET, SKY_HEIGHT - PLAYER_HEIGHT);
        self.player.vertical_velocity = 0.0;
        self.player.on_ground = true;
        self.emit(GameEvent::Teleported);
    }

    /* ---------- shop ---------- */
    fn open_shop(&mut self) {
        self.state = GameState::Shop;
        self.shop_tab = ShopTab::Sell;
        self.player.vertical_velocity = 0.0;
        self.emit(GameEvent::ShopOpened);
    }

    fn close_shop(&mut self) {
        self.state = GameState::Playing;
        let exit_x = WORLD_RIGHT - PLAYER_WIDTH - SHOP_EXIT_OFFSET;
        self.player.place_on_ground(&self.grid, exit_x);
        self.emit(GameEvent::ShopClosed);
    }

    fn shop_frame(&mut self, intents: &[Intent]) {
        if intents.contains(&Intent::CloseShop) {
            self.close_shop();
            return;
        }

        for intent in intents {
            if let Intent::SelectShopTab(tab) = *intent {
                self.shop_tab = tab;
            }
        }

        let Some(intent) = intents.iter().copied().find(|i| i.is_transaction()) else {
            return;
        };
        let outcome = match intent {
            Intent::SellOre(ore) => self.economy.sell(ore).map(|earned| GameEvent::Sold { ore, earned }),
            Intent::BuyTool(kind) => self
                .economy
                .buy_tool(&mut self.tools, kind)
                .map(|()| GameEvent::ToolBought(kind)),
            Intent::BuyUpgrade(track) => self
                .economy
                .buy_upgrade(&mut self.tools, track)
                .map(|level| GameEvent::UpgradeBought { track, level }),
            Intent::BuySkin(skin) => self.economy.buy_skin(skin).map(|()| GameEvent::SkinBought(skin)),
            Intent::ToggleSkin(skin) => self.economy.toggle_skin(skin).map(GameEvent::SkinChanged),
            Intent::EquipTool(kind) => self.tools.equip(kind).map(|()| GameEvent::ToolEquipped(kind)),
            _ => return,
        };
        self.emit(outcome.unwrap_or_else(GameEvent::Rejected));
    }

    /* ---------- bookkeeping ---------- */
    fn age_flash(&mut self, dt: f32) {
        let Some(flash) = self.flash.as_mut() else { return };
        flash.ttl -= dt;
        if flash.ttl <= 0.0 {
            self.flash = None;
        }
    }

    fn emit(&mut self, event: GameEvent) {
        match &event {
            GameEvent::FossilComplete => {
                info!("all {FOSSIL_COUNT} fossil pieces recovered");
                self.state = GameState::FossilComplete;
            }
            GameEvent::FossilFound { piece, found } => info!("found {} ({found}/{FOSSIL_COUNT})", piece.label()),
            GameEvent::FossilDestroyed(piece) => warn!("{} destroyed by a blast", piece.label()),
            GameEvent::ToolBroke(kind) => info!("{} broke", kind.label()),
            GameEvent::Rejected(err) => debug!("rejected: {err}"),
            other => debug!("{other:?}"),
        }
        if let Some((text, duration)) = event.flash() {
            self.flash = Some(Flash::new(text, duration));
        }
        self.events.push(event);
    }
}
