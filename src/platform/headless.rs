//! Headless embedding
//!
//! A presenter that draws nothing and a navigator that only records, for the
//! native binary and for tests.

use std::convert::Infallible;

use crate::driver::{FrameView, Navigator, Presenter};

/// Counts frames instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct HeadlessPresenter {
    pub frames_presented: u64,
    /// Frames on which the position buffer would have been re-uploaded
    pub position_uploads: u64,
    pub last_opacity: f32,
    pub size: (u32, u32),
}

impl Presenter for HeadlessPresenter {
    type Error = Infallible;

    fn present(&mut self, view: &FrameView<'_>) -> Result<(), Infallible> {
        self.frames_presented += 1;
        if view.positions_dirty {
            self.position_uploads += 1;
        }
        self.last_opacity = view.label_opacity;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

/// Remembers every link it was asked to open
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    pub opened: Vec<(String, String)>,
}

impl Navigator for RecordingNavigator {
    fn open(&mut self, url: &str, target: &str) {
        log::info!("Would open {} in {}", url, target);
        self.opened.push((url.to_string(), target.to_string()));
    }
}
