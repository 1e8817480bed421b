//! The interactive render loop.
//!
//! One [`RenderContext::tick`] per displayed frame:
//!
//! `Idle -> ApplyingInput -> BasisRefresh -> Rendering -> Publishing -> Idle`
//!
//! A `Quit` event moves to `Shutdown` instead, after which nothing renders.

use anyhow::{Context as _, Result};
use orb_core::Scene;
use orb_renderer::{render, Camera, Framebuffer, RenderConfig};

use crate::command::{apply_command, Command, Steps, ViewState};
use crate::input::{Binding, InputEvent, KeyMap};
use crate::surface::{fit_frame_size, PresentationSurface};

/// Where the loop is in its per-frame cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    ApplyingInput,
    BasisRefresh,
    Rendering,
    Publishing,
    Shutdown,
}

/// All state owned by the render loop.
///
/// Dropping the context (or calling [`RenderContext::shutdown`]) releases
/// the presentation surface.
pub struct RenderContext<S: PresentationSurface> {
    view: ViewState,
    framebuffer: Framebuffer,
    config: RenderConfig,
    steps: Steps,
    keymap: KeyMap,
    selected: usize,
    surface: Option<S>,
    state: LoopState,
    frames: u64,
}

impl<S: PresentationSurface> RenderContext<S> {
    /// Create a context rendering `view` at `width x height`.
    pub fn new(
        view: ViewState,
        width: usize,
        height: usize,
        config: RenderConfig,
        surface: S,
    ) -> Result<Self> {
        let (fit_width, fit_height) = fit_frame_size(width, height, surface.max_dimension());
        if (fit_width, fit_height) != (width, height) {
            log::warn!(
                "Frame size {}x{} exceeds the surface limit, using {}x{}",
                width,
                height,
                fit_width,
                fit_height
            );
        }
        let framebuffer = Framebuffer::new(fit_width, fit_height)
            .context("Failed to allocate framebuffer")?;

        Ok(Self {
            view,
            framebuffer,
            config,
            steps: Steps::default(),
            keymap: KeyMap::default(),
            selected: 0,
            surface: Some(surface),
            state: LoopState::Idle,
            frames: 0,
        })
    }

    /// Set the per-command movement increments.
    pub fn with_steps(mut self, steps: Steps) -> Self {
        self.steps = steps;
        self
    }

    /// Replace the key bindings.
    pub fn with_keymap(mut self, keymap: KeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of frames published so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn camera(&self) -> &Camera {
        &self.view.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.view.scene
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Index of the sphere moved by the sphere keys.
    pub fn selected_sphere(&self) -> usize {
        self.selected
    }

    /// The presentation surface, or `None` after shutdown.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Run one frame: apply all queued input, then render and publish.
    ///
    /// A frame renders even when no input arrived. If rendering or
    /// publishing fails the frame is abandoned, the error is returned, and
    /// the loop goes back to `Idle` with the previous frame still shown.
    pub fn tick<I>(&mut self, events: I) -> Result<LoopState>
    where
        I: IntoIterator<Item = InputEvent>,
    {
        if self.state == LoopState::Shutdown {
            return Ok(LoopState::Shutdown);
        }

        self.state = LoopState::ApplyingInput;
        let mut turned = false;
        for event in events {
            match event {
                InputEvent::Quit => {
                    self.shutdown();
                    return Ok(LoopState::Shutdown);
                }
                InputEvent::KeyDown(key) => match self.keymap.decode(key) {
                    Some(binding) => turned |= self.apply_binding(binding),
                    None => log::trace!("Ignoring unbound key {:?}", key),
                },
            }
        }

        let result = self.finish_frame(turned);
        self.state = LoopState::Idle;
        result.map(|()| LoopState::Idle)
    }

    /// Render at a new size from the next tick on.
    ///
    /// Sizes under 2x2 (including a minimized window) cannot form a
    /// viewport and are ignored. Sides beyond what the surface can display
    /// are clamped. Returns whether the framebuffer was reallocated.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if width < 2 || height < 2 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return false;
        }
        let (width, height) = match &self.surface {
            Some(surface) => fit_frame_size(width, height, surface.max_dimension()),
            None => (width, height),
        };
        match self.framebuffer.resize(width, height) {
            Ok(changed) => {
                if changed {
                    log::info!("Framebuffer resized to {}x{}", width, height);
                }
                changed
            }
            Err(e) => {
                log::warn!("Keeping framebuffer size: {}", e);
                false
            }
        }
    }

    /// Stop the loop and release the surface.
    pub fn shutdown(&mut self) {
        if self.state == LoopState::Shutdown {
            return;
        }
        self.state = LoopState::Shutdown;
        self.surface = None;
        log::info!("Render loop shut down after {} frames", self.frames);
    }

    /// Apply one decoded binding, returning whether the camera turned.
    fn apply_binding(&mut self, binding: Binding) -> bool {
        let command = match binding {
            Binding::Command(command) => command,
            Binding::MoveSelected(delta) => Command::MoveSphere {
                index: self.selected,
                delta,
            },
            Binding::SelectNext => {
                if !self.view.scene.is_empty() {
                    self.selected = (self.selected + 1) % self.view.scene.len();
                    log::info!("Selected sphere {}", self.selected);
                }
                return false;
            }
        };

        match apply_command(&mut self.view, command, &self.steps) {
            Ok(turned) => turned,
            Err(e) => {
                log::warn!("{:?} ignored: {}", command, e);
                false
            }
        }
    }

    fn finish_frame(&mut self, turned: bool) -> Result<()> {
        if turned {
            self.state = LoopState::BasisRefresh;
            self.view
                .camera
                .refresh_basis()
                .context("Failed to refresh camera basis")?;
        }

        self.state = LoopState::Rendering;
        let stats = render(
            &self.view.scene,
            &self.view.camera,
            &mut self.framebuffer,
            &self.config,
        )
        .context("Render failed")?;

        self.state = LoopState::Publishing;
        if let Some(surface) = self.surface.as_mut() {
            surface
                .present(
                    self.framebuffer.width(),
                    self.framebuffer.height(),
                    self.framebuffer.bytes(),
                )
                .context("Failed to present frame")?;
        }

        self.frames += 1;
        log::trace!("Frame {} took {:?}", self.frames, stats.elapsed);
        Ok(())
    }
}
