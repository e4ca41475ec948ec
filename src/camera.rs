use bevy::prelude::*;

use crate::components::PlayerSprite;
use crate::constants::*;
use crate::session::GameSession;

/// pixel snapping helper – keeps the camera on whole pixels so sprites never
/// land on half‑pixels and shimmer
#[inline]
fn snap(v: f32) -> f32 {
    v.round()
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(SCREEN_WIDTH * 0.5, -SCREEN_HEIGHT * 0.5, 0.0),
    ));
}

/// vertical follow; the world is exactly one screen wide so x stays put
pub fn camera_follow_system(
    mut cam_q: Query<&mut Transform, (With<Camera>, Without<PlayerSprite>)>,
    player_q:  Query<&Transform, With<PlayerSprite>>,
    window_q:  Query<&Window>,
    session:   Res<GameSession>,
) {
    let Ok(mut cam_tf) = cam_q.get_single_mut() else { return };
    let Ok(player_tf)  = player_q.get_single()  else { return };
    let half_h = window_q
        .get_single()
        .map(|w| w.height() * 0.5)
        .unwrap_or(SCREEN_HEIGHT * 0.5);

    let world_h = SKY_HEIGHT + session.grid().rows() as f32 * TILE_SIZE;
    let lowest  = (-world_h + half_h).min(-half_h);

    let y = player_tf.translation.y.clamp(lowest, -half_h);
    cam_tf.translation.x = snap(SCREEN_WIDTH * 0.5);
    cam_tf.translation.y = snap(y);
}
