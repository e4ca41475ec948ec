//! bevy wiring: keyboard → intents → one session tick → events & sprites

use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::camera::{camera_follow_system, setup_camera};
use crate::hud::{setup_hud, update_hud_system};
use crate::player::{player_input_system, spawn_player_sprite, sync_player_sprite_system};
use crate::session::{FrameIntents, GameEvent, GameSession, GameState, Intent, SessionConfig};
use crate::tile_sprites::{
    redraw_changed_tiles_system, spawn_aim_marker, spawn_tiles_system, sync_aim_marker_system,
};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    Input,
    Tick,
}

/// the game itself, no rendering; runs fine under `MinimalPlugins`
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SessionConfig,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(GameSession::new(&self.config))
            .init_resource::<FrameIntents>()
            .add_event::<GameEvent>()
            .configure_sets(Update, (SimSet::Input, SimSet::Tick).chain())
            .add_systems(
                Update,
                (
                    player_input_system.run_if(playing),
                    shop_input_system.run_if(shopping),
                    session_keys_system,
                )
                    .chain()
                    .in_set(SimSet::Input),
            )
            .add_systems(Update, tick_session_system.in_set(SimSet::Tick));
    }
}

/// sprites, hud & camera on top of [`SimulationPlugin`]
pub struct ViewPlugin;

impl Plugin for ViewPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                setup_camera,
                spawn_tiles_system,
                spawn_aim_marker,
                spawn_player_sprite,
                setup_hud,
            ),
        )
        .add_systems(
            Update,
            (
                redraw_changed_tiles_system,
                sync_aim_marker_system,
                sync_player_sprite_system,
                update_hud_system,
            )
                .after(SimSet::Tick),
        )
        .add_systems(PostUpdate, camera_follow_system);
    }
}

/* ---------- run conditions ---------- */

fn playing(session: Res<GameSession>) -> bool {
    session.state() == GameState::Playing
}

fn shopping(session: Res<GameSession>) -> bool {
    session.state() == GameState::Shop
}

/* ---------- input ---------- */

const ROW_KEYS: [KeyCode; 6] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
];

/// Tab cycles tabs, Esc leaves, 1‑6 act on the matching row
pub fn shop_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<GameSession>,
    mut intents: ResMut<FrameIntents>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        intents.push(Intent::CloseShop);
        return;
    }
    if keys.just_pressed(KeyCode::Tab) {
        intents.push(Intent::SelectShopTab(session.shop_tab().next()));
        return;
    }
    let row = ROW_KEYS.iter().position(|key| keys.just_pressed(*key));
    if let Some(intent) = row.and_then(|row| session.shop_row_intent(row)) {
        intents.push(intent);
    }
}

/// keys honoured in every state
pub fn session_keys_system(keys: Res<ButtonInput<KeyCode>>, mut intents: ResMut<FrameIntents>) {
    if keys.just_pressed(KeyCode::KeyQ) {
        intents.push(Intent::Quit);
    }
}

/* ---------- tick ---------- */

pub fn tick_session_system(
    time: Res<Time>,
    mut session: ResMut<GameSession>,
    mut intents: ResMut<FrameIntents>,
    mut events: EventWriter<GameEvent>,
    mut exit: EventWriter<AppExit>,
) {
    let frame = intents.take();
    let snap = session.tick(time.delta_secs(), &frame);
    events.send_batch(snap.events.iter().cloned());
    if snap.quit_requested {
        exit.send(AppExit::Success);
    }
}
