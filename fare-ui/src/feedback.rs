//! Transient, self-clearing user feedback: the copy button's success/error
//! state and tooltips.

use std::time::Duration;

use tokio::time::Instant;

use crate::models::FareField;

/// Visual state of the copy control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyButtonState {
    #[default]
    Neutral,
    Success,
    Error,
}

/// Where a tooltip is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipAnchor {
    CopyButton,
    Field(FareField),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub anchor: TooltipAnchor,
    pub message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Feedback {
    button: CopyButtonState,
    button_reverts_at: Option<Instant>,
    tooltips: Vec<Tooltip>,
    button_duration: Duration,
    tooltip_duration: Duration,
}

impl Feedback {
    pub fn new(
        button_duration: Duration,
        tooltip_duration: Duration,
    ) -> Self {
        Self {
            button: CopyButtonState::Neutral,
            button_reverts_at: None,
            tooltips: Vec::new(),
            button_duration,
            tooltip_duration,
        }
    }

    pub fn button(&self) -> CopyButtonState {
        self.button
    }

    pub fn tooltips(&self) -> &[Tooltip] {
        &self.tooltips
    }

    /// Sets the copy button state and restarts its revert timer.
    pub fn flash_button(
        &mut self,
        state: CopyButtonState,
        now: Instant,
    ) {
        self.button = state;
        self.button_reverts_at = match state {
            CopyButtonState::Neutral => None,
            _ => Some(now + self.button_duration),
        };
    }

    pub fn show_tooltip(
        &mut self,
        anchor: TooltipAnchor,
        message: impl Into<String>,
        now: Instant,
    ) {
        self.tooltips.push(Tooltip {
            anchor,
            message: message.into(),
            expires_at: now + self.tooltip_duration,
        });
    }

    /// Reverts the button and drops tooltips whose time is up.
    ///
    /// Returns `true` if anything visible changed.
    pub fn expire(
        &mut self,
        now: Instant,
    ) -> bool {
        let mut changed = false;

        if self.button_reverts_at.is_some_and(|at| at <= now) {
            self.button = CopyButtonState::Neutral;
            self.button_reverts_at = None;
            changed = true;
        }

        let before = self.tooltips.len();
        self.tooltips.retain(|tip| tip.expires_at > now);
        changed || self.tooltips.len() != before
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tooltips
            .iter()
            .map(|tip| tip.expires_at)
            .chain(self.button_reverts_at)
            .min()
    }

    pub fn clear(&mut self) {
        self.button = CopyButtonState::Neutral;
        self.button_reverts_at = None;
        self.tooltips.clear();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn feedback() -> Feedback {
        Feedback::new(Duration::from_millis(1000), Duration::from_millis(2000))
    }

    #[test]
    fn button_reverts_after_feedback_duration() {
        let start = Instant::now();
        let mut fb = feedback();
        fb.flash_button(CopyButtonState::Success, start);

        assert!(!fb.expire(start + Duration::from_millis(999)));
        assert_eq!(fb.button(), CopyButtonState::Success);

        assert!(fb.expire(start + Duration::from_millis(1000)));
        assert_eq!(fb.button(), CopyButtonState::Neutral);
    }

    #[test]
    fn reflashing_restarts_the_timer() {
        let start = Instant::now();
        let mut fb = feedback();
        fb.flash_button(CopyButtonState::Success, start);
        fb.flash_button(CopyButtonState::Error, start + Duration::from_millis(600));

        fb.expire(start + Duration::from_millis(1000));

        assert_eq!(fb.button(), CopyButtonState::Error);
        assert_eq!(
            fb.next_deadline(),
            Some(start + Duration::from_millis(1600))
        );
    }

    #[test]
    fn tooltips_outlive_the_button_state() {
        let start = Instant::now();
        let mut fb = feedback();
        fb.flash_button(CopyButtonState::Error, start);
        fb.show_tooltip(TooltipAnchor::CopyButton, "Failed to copy", start);

        fb.expire(start + Duration::from_millis(1500));
        assert_eq!(fb.tooltips().len(), 1);

        fb.expire(start + Duration::from_millis(2000));
        assert!(fb.tooltips().is_empty());
        assert_eq!(fb.next_deadline(), None);
    }
}
