//! Scatter/chase state with the transient vulnerable override.

use maze_pursuit_core::Mode;

/// Per-pursuer targeting regime.
///
/// The baseline [`Mode`] is driven by the game-rules timer. Vulnerability is
/// layered on top: entering it remembers the baseline, leaving it restores
/// that baseline. Every real transition in or out of vulnerability grants a
/// single reversal to the next decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeController {
    mode: Mode,
    saved_mode: Option<Mode>,
    reversal_allowed: bool,
}

impl ModeController {
    /// Starts in scatter mode, not vulnerable, with no pending reversal.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Mode::Scatter,
            saved_mode: None,
            reversal_allowed: false,
        }
    }

    /// Baseline targeting regime.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the vulnerable override is active.
    #[must_use]
    pub const fn is_vulnerable(&self) -> bool {
        self.saved_mode.is_some()
    }

    /// Whether the next decision may reverse the last committed direction.
    #[must_use]
    pub const fn reversal_allowed(&self) -> bool {
        self.reversal_allowed
    }

    /// Enters or leaves the vulnerable override. Returns `true` on a change.
    pub fn set_vulnerable(&mut self, vulnerable: bool) -> bool {
        match (vulnerable, self.saved_mode) {
            (true, None) => {
                self.saved_mode = Some(self.mode);
                self.reversal_allowed = true;
                true
            }
            (false, Some(saved)) => {
                self.mode = saved;
                self.saved_mode = None;
                self.reversal_allowed = true;
                true
            }
            _ => false,
        }
    }

    /// Leaves the vulnerable override, if active.
    pub fn end_vulnerable(&mut self) -> bool {
        self.set_vulnerable(false)
    }

    /// Switches the baseline regime. Returns `true` on a change.
    ///
    /// While vulnerable the new mode also replaces the remembered one, so the
    /// pursuer resumes the current schedule phase once the override ends.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if let Some(saved) = self.saved_mode.as_mut() {
            *saved = mode;
        }
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Clears the one-shot reversal permission after a commit.
    pub fn consume_reversal(&mut self) {
        self.reversal_allowed = false;
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}
