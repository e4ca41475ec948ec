//! coins, ore inventory, skins & every shop transaction
//!
//! All purchases go through [`pay`]: the balance is checked first, the grant
//! runs next and may still refuse, and coins are only debited once the grant
//! went through. Either both happen or neither does.

use std::collections::HashSet;

use thiserror::Error;

use crate::constants::*;
use crate::terrain::{Ore, OreTable};
use crate::tools::{ToolKind, ToolSystem, UpgradeTrack};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("Not enough coins!")]
    NotEnoughCoins { cost: u32, coins: u32 },
    #[error("No {} to sell", .0.label())]
    NothingToSell(Ore),
    #[error("{} is already maxed out", .0.label())]
    MaxLevel(UpgradeTrack),
    #[error("{} already owned", .0.label())]
    AlreadyOwned(ToolKind),
    #[error("You don't own a {}", .0.label())]
    NotOwned(ToolKind),
    #[error("Buy a Pickaxe in the Tools tab first.")]
    PickaxeRequired,
    #[error("{} skin already owned", .0.label())]
    SkinAlreadyOwned(Skin),
    #[error("{} skin not owned", .0.label())]
    SkinNotOwned(Skin),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Skin {
    Santa,
}

impl Skin {
    pub const ALL: [Skin; 1] = [Skin::Santa];

    pub const fn label(self) -> &'static str {
        match self {
            Skin::Santa => "Santa",
        }
    }

    pub const fn price(self) -> u32 {
        match self {
            Skin::Santa => SANTA_SKIN_PRICE,
        }
    }
}

fn pay<T>(
    coins: &mut u32,
    cost: u32,
    grant: impl FnOnce() -> Result<T, ShopError>,
) -> Result<T, ShopError> {
    if *coins < cost {
        return Err(ShopError::NotEnoughCoins { cost, coins: *coins });
    }
    let granted = grant()?;
    *coins -= cost;
    Ok(granted)
}

#[derive(Clone, Debug, Default)]
pub struct EconomyStore {
    coins: u32,
    inventory: OreTable<u32>,
    owned_skins: HashSet<Skin>,
    equipped_skin: Option<Skin>,
}

impl EconomyStore {
    pub fn new(coins: u32) -> Self {
        Self { coins, ..Self::default() }
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn inventory(&self) -> &OreTable<u32> {
        &self.inventory
    }

    pub fn owns_skin(&self, skin: Skin) -> bool {
        self.owned_skins.contains(&skin)
    }

    pub fn equipped_skin(&self) -> Option<Skin> {
        self.equipped_skin
    }

    pub(crate) fn add_ore(&mut self, ore: Ore, amount: u32) {
        self.inventory[ore] += amount;
    }

    /// sell the whole stack of `ore`; returns the coins earned
    pub fn sell(&mut self, ore: Ore) -> Result<u32, ShopError> {
        let count = self.inventory[ore];
        if count == 0 {
            return Err(ShopError::NothingToSell(ore));
        }
        let earned = count * ore.price();
        self.coins += earned;
        self.inventory[ore] = 0;
        Ok(earned)
    }

    /// generic checked purchase for grants living outside the store
    pub fn purchase<T>(
        &mut self,
        cost: u32,
        grant: impl FnOnce() -> Result<T, ShopError>,
    ) -> Result<T, ShopError> {
        pay(&mut self.coins, cost, grant)
    }

    pub fn buy_tool(&mut self, tools: &mut ToolSystem, kind: ToolKind) -> Result<(), ShopError> {
        self.purchase(kind.def().price, || tools.grant(kind))
    }

    /// returns the new level
    pub fn buy_upgrade(
        &mut self,
        tools: &mut ToolSystem,
        track: UpgradeTrack,
    ) -> Result<u8, ShopError> {
        if !tools.owns(ToolKind::Pickaxe) {
            return Err(ShopError::PickaxeRequired);
        }
        let cost = track
            .next_cost(tools.upgrades()[track])
            .ok_or(ShopError::MaxLevel(track))?;
        self.purchase(cost, || tools.raise_upgrade(track))
    }

    pub fn buy_skin(&mut self, skin: Skin) -> Result<(), ShopError> {
        if self.owns_skin(skin) {
            return Err(ShopError::SkinAlreadyOwned(skin));
        }
        pay(&mut self.coins, skin.price(), || {
            self.owned_skins.insert(skin);
            Ok(())
        })
    }

    /// equip an owned skin, or take it off if it is already worn
    pub fn toggle_skin(&mut self, skin: Skin) -> Result<Option<Skin>, ShopError> {
        if !self.owns_skin(skin) {
            return Err(ShopError::SkinNotOwned(skin));
        }
        self.equipped_skin = match self.equipped_skin {
            Some(worn) if worn == skin => None,
            _ => Some(skin),
        };
        Ok(self.equipped_skin)
    }
}
