//! Double-tap-to-exit on exit-eligible routes.

use shared::config::ClientConfig;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// Text of the prompt shown after the first back press on an exit route.
pub const EXIT_PROMPT_MESSAGE: &str = "Press back again to close the app";

/// Identifies one presented exit prompt.
///
/// Each arming press hands out a fresh id, so a dismissal reported late for
/// an earlier prompt cannot disarm a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromptId(u64);

/// Router and app hooks the back-navigation handler drives.
pub trait NavigationHost {
    /// Whether the in-app router has history to pop.
    fn can_go_back(&self) -> bool;
    /// Route currently displayed, e.g. `/deployment`.
    fn current_url(&self) -> String;
    /// Pops the in-app router.
    fn navigate_back_in_app(&self);
    /// Falls back to browser-style history navigation.
    fn history_back(&self);
    /// Closes the app.
    fn exit_app(&self);
    /// Shows a transient message; the owner reports `prompt` back through
    /// [`DoubleTapExit::prompt_dismissed`] once it is gone.
    fn present_exit_prompt(&self, prompt: PromptId, message: &str, duration: Duration);
}

/// What a single back press resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// The in-app router popped a page.
    InAppBack,
    /// First press on an exit route; the prompt is showing.
    PromptShown(PromptId),
    /// Second press on an exit route; the app was closed.
    Exited,
    /// Not an exit route; history navigation took over.
    HistoryBack,
}

/// Double-tap-to-exit state machine.
///
/// On an exit-eligible route with no router history, the first press arms
/// the handler and shows a prompt, the second press exits. Any other press
/// leaves the tap counter alone.
#[derive(Debug, Clone)]
pub struct DoubleTapExit {
    exit_routes: HashSet<String>,
    taps: u8,
    armed_prompt: Option<PromptId>,
    next_prompt: u64,
    prompt_duration: Duration,
}

impl DoubleTapExit {
    /// Builds a disarmed handler for the configured exit routes.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            exit_routes: config.exit_routes.iter().cloned().collect(),
            taps: 0,
            armed_prompt: None,
            next_prompt: 0,
            prompt_duration: config.exit_prompt_duration(),
        }
    }

    /// Presses counted since the handler was last disarmed.
    #[must_use]
    pub fn taps(&self) -> u8 {
        self.taps
    }

    /// Prompt currently arming the handler, if any.
    #[must_use]
    pub fn armed_prompt(&self) -> Option<PromptId> {
        self.armed_prompt
    }

    /// Whether a back press on `url` may close the app.
    #[must_use]
    pub fn is_exit_route(&self, url: &str) -> bool {
        self.exit_routes.contains(url)
    }

    /// Handles one hardware back press.
    pub fn handle(&mut self, host: &dyn NavigationHost) -> BackOutcome {
        if host.can_go_back() {
            debug!("back press handled by router");
            host.navigate_back_in_app();
            return BackOutcome::InAppBack;
        }

        let url = host.current_url();
        if !self.is_exit_route(&url) {
            debug!(%url, "back press delegated to history");
            host.history_back();
            return BackOutcome::HistoryBack;
        }

        self.taps += 1;
        if self.taps >= 2 {
            info!(%url, "exiting app on double back press");
            self.disarm();
            host.exit_app();
            BackOutcome::Exited
        } else {
            let prompt = PromptId(self.next_prompt);
            self.next_prompt += 1;
            self.armed_prompt = Some(prompt);
            host.present_exit_prompt(prompt, EXIT_PROMPT_MESSAGE, self.prompt_duration);
            BackOutcome::PromptShown(prompt)
        }
    }

    /// The exit prompt `prompt` expired without a second press.
    ///
    /// Returns `false` and changes nothing when `prompt` is not the one
    /// currently arming the handler.
    pub fn prompt_dismissed(&mut self, prompt: PromptId) -> bool {
        if self.armed_prompt != Some(prompt) {
            debug!(?prompt, "ignoring dismissal of a stale exit prompt");
            return false;
        }
        debug!(?prompt, "exit prompt dismissed, disarming");
        self.disarm();
        true
    }

    fn disarm(&mut self) {
        self.taps = 0;
        self.armed_prompt = None;
    }
}
