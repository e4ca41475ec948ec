//! text overlay: status line, fading flash message & the shop panel

use std::fmt::Write as _;

use bevy::prelude::*;

use crate::components::{FlashText, ShopPanel, StatusText};
use crate::constants::FOSSIL_COUNT;
use crate::session::{GameSession, GameState, ShopTab};
use crate::snapshot::{ShopView, Snapshot};

const TEXT_COLOR: Color = Color::srgb(0.95, 0.95, 0.90);
const FLASH_COLOR: Color = Color::srgb(1.0, 0.92, 0.35);
const PANEL_BG: Color = Color::srgba(0.05, 0.04, 0.03, 0.85);

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont { font_size: 18.0, ..default() },
        TextColor(TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        StatusText,
    ));
    commands.spawn((
        Text::new(""),
        TextFont { font_size: 22.0, ..default() },
        TextColor(FLASH_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(40.0),
            left: Val::Px(10.0),
            ..default()
        },
        FlashText,
    ));
    commands.spawn((
        Text::new(""),
        TextFont { font_size: 18.0, ..default() },
        TextColor(TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(80.0),
            left: Val::Px(10.0),
            padding: UiRect::all(Val::Px(12.0)),
            ..default()
        },
        BackgroundColor(PANEL_BG),
        Visibility::Hidden,
        ShopPanel,
    ));
}

/* ---------- formatting ---------- */

pub fn status_line(snap: &Snapshot) -> String {
    if snap.state == GameState::FossilComplete {
        return format!("All {FOSSIL_COUNT} fossil pieces recovered! Press Q to quit.");
    }

    let mut line = format!("Coins: {}   Tool: {}", snap.coins, snap.tool.kind.label());
    if let Some((left, full)) = snap.tool.durability {
        let _ = write!(line, " ({left}/{full})");
    }
    if snap.tool.dynamite_stock > 0 {
        let _ = write!(line, "   Dynamite: {}", snap.tool.dynamite_stock);
    }
    let _ = write!(line, "   Fossils: {}/{FOSSIL_COUNT}", snap.fossils_found);
    let aimed = snap.target.and_then(|cell| snap.grid.get(cell)).filter(|b| !b.is_air());
    if let Some(block) = aimed {
        let _ = write!(line, "   Target: {} {}/{}", block.kind.label(), block.hp, block.max_hp);
    }
    for (ore, count) in snap.inventory.iter().filter(|(_, n)| *n > 0) {
        let _ = write!(line, "   {}: {count}", ore.label());
    }
    line
}

pub fn shop_text(view: &ShopView) -> String {
    let mut text = String::new();
    for tab in ShopTab::ALL {
        if tab == view.tab() {
            let _ = write!(text, "[{}] ", tab.label());
        } else {
            let _ = write!(text, " {}  ", tab.label());
        }
    }
    text.push_str("   Tab: next tab   Esc: leave\n\n");

    match view {
        ShopView::Sell(rows) => {
            for (i, row) in rows.iter().enumerate() {
                let _ = writeln!(
                    text,
                    "{}. {} x{} @ {} = {}",
                    i + 1,
                    row.ore.label(),
                    row.count,
                    row.price,
                    row.value()
                );
            }
        }
        ShopView::Upgrades(None) => text.push_str("Buy a Pickaxe in the Tools tab first.\n"),
        ShopView::Upgrades(Some(rows)) => {
            for (i, row) in rows.iter().enumerate() {
                let cost = match row.next_cost {
                    Some(cost) => format!("{cost} coins"),
                    None => "MAX".to_string(),
                };
                let _ = writeln!(text, "{}. {} {} - {cost}", i + 1, row.track.label(), row.level);
            }
        }
        ShopView::Tools(rows) => {
            for (i, row) in rows.iter().enumerate() {
                let state = match (row.equipped, row.owned) {
                    (true, _) => "equipped".to_string(),
                    (false, true) => "owned".to_string(),
                    (false, false) => format!("{} coins", row.price),
                };
                let _ = writeln!(text, "{}. {} - {state}", i + 1, row.kind.label());
            }
        }
        ShopView::Skins(rows) => {
            for (i, row) in rows.iter().enumerate() {
                let state = match (row.equipped, row.owned) {
                    (true, _) => "worn".to_string(),
                    (false, true) => "owned".to_string(),
                    (false, false) => format!("{} coins", row.price),
                };
                let _ = writeln!(text, "{}. {} - {state}", i + 1, row.skin.label());
            }
        }
    }
    text
}

/* ---------- system ---------- */

#[allow(clippy::type_complexity)]
pub fn update_hud_system(
    session: Res<GameSession>,
    mut status_q: Query<&mut Text, (With<StatusText>, Without<FlashText>, Without<ShopPanel>)>,
    mut flash_q: Query<
        (&mut Text, &mut TextColor),
        (With<FlashText>, Without<StatusText>, Without<ShopPanel>),
    >,
    mut shop_q: Query<
        (&mut Text, &mut Visibility),
        (With<ShopPanel>, Without<StatusText>, Without<FlashText>),
    >,
) {
    let snap = session.snapshot();

    for mut text in &mut status_q {
        **text = status_line(&snap);
    }

    for (mut text, mut color) in &mut flash_q {
        match snap.flash {
            Some(flash) => {
                **text = flash.text.clone();
                color.0 = FLASH_COLOR.with_alpha(flash.remaining());
            }
            None => text.clear(),
        }
    }

    for (mut text, mut vis) in &mut shop_q {
        match &snap.shop {
            Some(view) => {
                **text = shop_text(view);
                *vis = Visibility::Visible;
            }
            None => *vis = Visibility::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::MineDirection;
    use crate::session::Intent;
    use crate::snapshot::SellRow;
    use crate::terrain::{BlockKind, Ore, TileGrid};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shop_text_marks_the_open_tab() {
        let view = ShopView::Sell(vec![SellRow { ore: Ore::Gold, count: 2, price: 15 }]);
        let text = shop_text(&view);
        assert!(text.starts_with("[Sell]"));
        assert!(text.contains("1. Gold x2 @ 15 = 30"));
    }

    #[test]
    fn locked_upgrades_point_at_the_pickaxe() {
        let text = shop_text(&ShopView::Upgrades(None));
        assert!(text.contains("[Upgrades]"));
        assert!(text.contains("Buy a Pickaxe"));
    }

    #[test]
    fn status_line_shows_the_aimed_block() {
        let grid = TileGrid::from_fn(3, crate::constants::GRID_COLS, |_, _| {
            BlockKind::Ore(Ore::Stone)
        });
        let mut session = GameSession::with_grid(grid, 0, StdRng::seed_from_u64(3));

        let line = status_line(&session.tick(1.0 / 60.0, &[]));
        assert!(!line.contains("Target"));

        // fists take one hp off the 6 hp stone underfoot
        session.tick(1.0 / 60.0, &[Intent::Mine(MineDirection::Down)]);
        let line = status_line(&session.tick(1.0 / 60.0, &[Intent::Aim(MineDirection::Down)]));
        assert!(line.contains("Target: Stone 5/6"), "{line}");
    }
}
