//! Camera and scene edits driven by input.
//!
//! Input decoding lives in [`crate::input`]; this module only knows how a
//! decoded command changes the camera or the scene.

use orb_core::{Scene, SceneError};
use orb_math::Vec3;
use orb_renderer::{Camera, RenderError};
use thiserror::Error;

/// A single edit applied between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    TranslateForward,
    TranslateBackward,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
    MoveSphere { index: usize, delta: Vec3 },
}

impl Command {
    /// Whether applying this command changes the view direction.
    pub fn turns_camera(&self) -> bool {
        matches!(
            self,
            Command::YawLeft | Command::YawRight | Command::PitchUp | Command::PitchDown
        )
    }
}

/// Errors that reject a command, leaving the state unchanged.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Camera update rejected: {0}")]
    Camera(#[from] RenderError),

    #[error("Scene update rejected: {0}")]
    Scene(#[from] SceneError),
}

/// Fixed movement increments per command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steps {
    /// Distance moved per translate command, in world units
    pub translate: f64,
    /// Angle turned per yaw or pitch command, in radians
    pub angle: f64,
}

impl Default for Steps {
    fn default() -> Self {
        Self {
            translate: 0.25,
            angle: 5.0_f64.to_radians(),
        }
    }
}

/// Everything a frame is rendered from.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub scene: Scene,
    pub camera: Camera,
}

impl ViewState {
    pub fn new(scene: Scene, camera: Camera) -> Self {
        Self { scene, camera }
    }
}

/// Apply one command to the view.
///
/// Returns `true` when the camera direction changed, so the caller knows to
/// refresh the basis before rendering.
pub fn apply_command(
    state: &mut ViewState,
    command: Command,
    steps: &Steps,
) -> Result<bool, CommandError> {
    let camera = &mut state.camera;
    match command {
        Command::TranslateForward => camera.translate(steps.translate),
        Command::TranslateBackward => camera.translate(-steps.translate),
        Command::YawLeft => camera.yaw(steps.angle)?,
        Command::YawRight => camera.yaw(-steps.angle)?,
        Command::PitchUp => camera.pitch(steps.angle)?,
        Command::PitchDown => camera.pitch(-steps.angle)?,
        Command::MoveSphere { index, delta } => state.scene.move_sphere(index, delta)?,
    }
    Ok(command.turns_camera())
}
