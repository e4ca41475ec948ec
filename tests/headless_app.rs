//! drives the simulation plugin through a windowless app with fake key presses

use std::time::Duration;

use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use dig_in_paris::economy::ShopError;
use dig_in_paris::session::ShopTab;
use dig_in_paris::terrain::Ore;
use dig_in_paris::{GameEvent, GameSession, GameState, SessionConfig, SimulationPlugin};

fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)))
        .init_resource::<ButtonInput<KeyCode>>()
        .add_plugins(SimulationPlugin {
            config: SessionConfig { seed: Some(11), ..default() },
        });
    app.update();
    app
}

fn keys(app: &mut App) -> Mut<ButtonInput<KeyCode>> {
    app.world_mut().resource_mut::<ButtonInput<KeyCode>>()
}

/// press for exactly one frame
fn tap(app: &mut App, pressed: &[KeyCode]) {
    for key in pressed {
        keys(app).press(*key);
    }
    app.update();
    for key in pressed {
        keys(app).release(*key);
    }
    keys(app).clear();
}

fn session(app: &App) -> &GameSession {
    app.world().resource::<GameSession>()
}

fn sent_events(app: &App) -> Vec<GameEvent> {
    app.world()
        .resource::<Events<GameEvent>>()
        .iter_current_update_events()
        .cloned()
        .collect()
}

#[test]
fn holding_d_walks_right() {
    let mut app = headless_app();
    let start = session(&app).player().pos;

    keys(&mut app).press(KeyCode::KeyD);
    for _ in 0..5 {
        app.update();
    }
    let now = session(&app).player().pos;
    assert!(now.x > start.x);
    assert_eq!(now.y, start.y);
}

#[test]
fn e_with_arrow_down_strikes_the_grass_underfoot() {
    let mut app = headless_app();
    tap(&mut app, &[KeyCode::ArrowDown, KeyCode::KeyE]);

    let events = sent_events(&app);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::BlockDamaged { hp: 1, max_hp: 2, .. })),
        "{events:?}"
    );
}

#[test]
fn holding_an_arrow_aims_without_swinging() {
    let mut app = headless_app();
    keys(&mut app).press(KeyCode::ArrowDown);
    app.update();
    let aimed = session(&app).aimed_cell();
    assert_eq!(aimed.map(|cell| cell.row), Some(0));
    assert!(sent_events(&app).is_empty());

    keys(&mut app).release(KeyCode::ArrowDown);
    keys(&mut app).clear();
    app.update();
    assert_eq!(session(&app).aimed_cell(), None);
}

#[test]
fn shop_round_trip_from_the_keyboard() {
    let mut app = headless_app();

    keys(&mut app).press(KeyCode::KeyD);
    for _ in 0..60 {
        app.update();
        if session(&app).state() == GameState::Shop {
            break;
        }
    }
    keys(&mut app).release(KeyCode::KeyD);
    keys(&mut app).clear();
    assert_eq!(session(&app).state(), GameState::Shop);
    assert_eq!(session(&app).shop_tab(), ShopTab::Sell);

    // nothing mined yet, so the first sell row is refused
    tap(&mut app, &[KeyCode::Digit1]);
    assert!(sent_events(&app).contains(&GameEvent::Rejected(ShopError::NothingToSell(Ore::Soil))));

    tap(&mut app, &[KeyCode::Tab]);
    assert_eq!(session(&app).shop_tab(), ShopTab::Upgrades);

    tap(&mut app, &[KeyCode::Escape]);
    assert_eq!(session(&app).state(), GameState::Playing);
    assert!(sent_events(&app).contains(&GameEvent::ShopClosed));
}

#[test]
fn q_requests_app_exit() {
    let mut app = headless_app();
    assert!(app.should_exit().is_none());
    tap(&mut app, &[KeyCode::KeyQ]);
    assert!(session(&app).quit_requested());
    assert_eq!(app.should_exit(), Some(AppExit::Success));
}
