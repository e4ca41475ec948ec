//! windowed bootstrap for the digging game

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin,
    LogDiagnosticsPlugin,
};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::{MonitorSelection, PrimaryWindow, WindowMode};

use dig_in_paris::constants::{SCREEN_HEIGHT, SCREEN_WIDTH, SKY_COLOR};
use dig_in_paris::{SessionConfig, SimulationPlugin, ViewPlugin};

/* ------------------------------------------------------------------------ */
/* F11 borderless‑fullscreen toggle                                         */
/* ------------------------------------------------------------------------ */
fn toggle_fullscreen(
    keys: Res<ButtonInput<KeyCode>>,
    mut window_q: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !keys.just_pressed(KeyCode::F11) {
        return;
    }
    let Ok(mut window) = window_q.get_single_mut() else { return };
    window.mode = match window.mode {
        WindowMode::Windowed => WindowMode::BorderlessFullscreen(MonitorSelection::Primary),
        _ => WindowMode::Windowed,
    };
}

/// `DIG_SEED=<u64>` replays a world
fn session_config() -> SessionConfig {
    let seed = std::env::var("DIG_SEED").ok().and_then(|s| s.parse().ok());
    SessionConfig { seed, ..default() }
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
fn main() {
    App::new()
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
            EntityCountDiagnosticsPlugin::default(),
        ))

        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(SKY_COLOR))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Dig in Paris".into(),
                resolution: (SCREEN_WIDTH, SCREEN_HEIGHT).into(),
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }))

        /* game ------------------------------------------------------------ */
        .add_plugins((SimulationPlugin { config: session_config() }, ViewPlugin))
        .add_systems(Update, toggle_fullscreen)
        .run();
}
