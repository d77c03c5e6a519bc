//! Settle detection and label fade-in
//!
//! Two phases: `Hidden` until the motion metric first dips below the threshold,
//! then `Revealing` forever. Opacity only ever grows, capped at 1.

use crate::config::FieldConfig;

/// Reveal state of the label
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealPhase {
    /// Field still moving, label invisible
    Hidden,
    /// Field settled; label fading in (terminal)
    Revealing {
        /// Frame on which the metric first fell below the threshold
        settled_at_frame: u64,
    },
}

/// Notable transitions, reported once each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// Hidden -> Revealing happened this frame
    Settled,
    /// Opacity reached 1.0 this frame
    FullyRevealed,
}

/// Watches the motion metric and owns the label opacity
#[derive(Debug, Clone)]
pub struct SettleDetector {
    phase: RevealPhase,
    opacity: f32,
    threshold: f32,
    fade_step: f32,
    /// `FullyRevealed` has been reported
    full_reported: bool,
}

impl SettleDetector {
    pub fn new(threshold: f32, fade_step: f32) -> Self {
        Self {
            phase: RevealPhase::Hidden,
            opacity: 0.0,
            threshold,
            fade_step,
            full_reported: false,
        }
    }

    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(config.settle_threshold, config.fade_step)
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_revealing(&self) -> bool {
        matches!(self.phase, RevealPhase::Revealing { .. })
    }

    /// Feed one frame's metric. Fades the label if settled (now or earlier).
    pub fn observe(&mut self, metric: f32, frame: u64) -> Option<RevealEvent> {
        let mut event = None;

        // Checked every frame; only the first success changes phase
        if metric < self.threshold && self.phase == RevealPhase::Hidden {
            self.phase = RevealPhase::Revealing {
                settled_at_frame: frame,
            };
            event = Some(RevealEvent::Settled);
        }

        if self.is_revealing() && self.opacity < 1.0 {
            self.opacity = (self.opacity + self.fade_step).min(1.0);
        }

        // One event per frame; a reveal that completes on the settle frame is reported next frame
        if self.opacity >= 1.0 && !self.full_reported && event.is_none() {
            self.full_reported = true;
            event = Some(RevealEvent::FullyRevealed);
        }

        event
    }
}
