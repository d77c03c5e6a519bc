//! Frame driver
//!
//! Owns the field state, camera and label, and runs exactly one simulation tick
//! per display refresh until its [`StopHandle`] is tripped. Drawing goes through
//! the [`Presenter`] seam and link activation through [`Navigator`], so the loop
//! runs the same in the browser, headless, and under test.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::consts::*;
use crate::pixel_to_ndc;
use crate::scene::{LabelSprite, OrbitControls, PerspectiveCamera};
use crate::sim::{FieldState, FrameReport, tick};

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub frame: u64,
    /// Flat xyz positions
    pub positions: &'a [f32],
    /// Positions changed since the last successful present
    pub positions_dirty: bool,
    pub label_opacity: f32,
    pub camera: &'a PerspectiveCamera,
    pub label: &'a LabelSprite,
}

/// Draws frames
pub trait Presenter {
    type Error: fmt::Display;

    fn present(&mut self, view: &FrameView<'_>) -> Result<(), Self::Error>;

    /// Drawing buffer size in physical pixels
    fn resize(&mut self, width: u32, height: u32);
}

/// Opens outbound links
pub trait Navigator {
    fn open(&mut self, url: &str, target: &str);
}

/// Cancellation token for the frame loop. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Result of one frame callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Frame ran; schedule the next one
    Continue(FrameReport),
    /// Stop was requested; do not reschedule
    Stopped,
}

/// Single owner of all per-frame state
pub struct FrameDriver<P: Presenter> {
    state: FieldState,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    label: LabelSprite,
    presenter: P,
    stop: StopHandle,
    /// Window size in CSS pixels, for mapping clicks to NDC
    viewport: (f32, f32),
}

impl<P: Presenter> FrameDriver<P> {
    pub fn new(state: FieldState, label: LabelSprite, presenter: P, viewport: (f32, f32)) -> Self {
        let camera = PerspectiveCamera::new(viewport.0 / viewport.1);
        let controls = OrbitControls::new(camera.target);
        Self {
            state,
            camera,
            controls,
            label,
            presenter,
            stop: StopHandle::new(),
            viewport,
        }
    }

    /// A handle that stops this driver from anywhere
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn label(&self) -> &LabelSprite {
        &self.label
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// One display refresh: camera easing, simulation tick, draw
    pub fn frame(&mut self) -> FrameOutcome {
        if self.stop.is_stopped() {
            return FrameOutcome::Stopped;
        }

        self.controls.update(&mut self.camera);
        let report = tick(&mut self.state);

        let view = FrameView {
            frame: report.frame,
            positions: self.state.particles.positions(),
            positions_dirty: self.state.particles.positions_dirty(),
            label_opacity: report.opacity,
            camera: &self.camera,
            label: &self.label,
        };
        match self.presenter.present(&view) {
            Ok(()) => self.state.particles.mark_positions_uploaded(),
            Err(e) => log::debug!("Frame {} not presented: {}", report.frame, e),
        }

        FrameOutcome::Continue(report)
    }

    /// Window resized: CSS size for picking, physical size for the surface
    pub fn resize(&mut self, css_size: (f32, f32), buffer_size: (u32, u32)) {
        self.viewport = css_size;
        self.camera.set_aspect(css_size.0 / css_size.1);
        self.presenter.resize(buffer_size.0, buffer_size.1);
        log::debug!(
            "Resized to {}x{} css ({}x{} buffer)",
            css_size.0,
            css_size.1,
            buffer_size.0,
            buffer_size.1
        );
    }

    /// Click at window coordinates. Opens the link if the label was hit.
    pub fn click<N: Navigator>(&mut self, x: f32, y: f32, navigator: &mut N) -> bool {
        let ndc = pixel_to_ndc(x, y, self.viewport.0, self.viewport.1);
        let ray = self.camera.ray_from_ndc(ndc);
        if self.label.intersect(&ray, &self.camera).is_none() {
            return false;
        }
        log::info!("Label clicked, opening {}", LINK_URL);
        navigator.open(LINK_URL, LINK_TARGET);
        true
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.controls.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, element_height: f32) {
        self.controls.pointer_move(x, y, element_height);
    }

    pub fn pointer_up(&mut self) {
        self.controls.pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.controls.wheel(delta_y);
    }
}
