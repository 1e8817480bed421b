//! Orb Viewport - interactive render loop and window presentation.
//!
//! This crate provides:
//!
//! - **Commands**: camera and sphere edits applied between frames
//! - **Input**: key bindings that turn key presses into commands
//! - **Render loop**: `RenderContext`, one tick per displayed frame
//! - **Presentation**: the `PresentationSurface` seam and a wgpu window surface

pub mod command;
pub mod context;
pub mod gpu;
pub mod input;
pub mod surface;

pub use command::{apply_command, Command, CommandError, Steps, ViewState};
pub use context::{LoopState, RenderContext};
pub use gpu::TextureSurface;
pub use input::{Binding, InputEvent, Key, KeyMap};
pub use surface::{check_frame_size, PresentationSurface, SurfaceError};
