/// Camera and minimap projections. Pure functions of positions and sizes.
use crate::config::CameraMode;

/// Top-left corner of the visible region, in world units.
///
/// `Clamped` keeps the viewport inside the world; when the viewport is larger
/// than the world on an axis the offset on that axis is 0. `Centered` always
/// puts the player in the middle of the view.
pub fn camera_offset(
    mode: CameraMode,
    player: (f32, f32),
    world: (f32, f32),
    view: (f32, f32),
) -> (f32, f32) {
    let x = player.0 - view.0 / 2.0;
    let y = player.1 - view.1 / 2.0;
    match mode {
        CameraMode::Clamped => (
            x.clamp(0.0, (world.0 - view.0).max(0.0)),
            y.clamp(0.0, (world.1 - view.1).max(0.0)),
        ),
        CameraMode::Centered => (x, y),
    }
}

/// Map a world point onto a minimap of size `map`.
pub fn minimap_project(point: (f32, f32), world: (f32, f32), map: (f32, f32)) -> (f32, f32) {
    (point.0 * map.0 / world.0, point.1 * map.1 / world.1)
}
