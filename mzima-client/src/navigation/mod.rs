//! Hardware back-button handling: a priority-ordered dispatcher and the
//! double-tap-to-exit state machine installed on Android shells.

pub mod back_button;
pub mod double_tap;

pub use back_button::{BackButtonDispatcher, BackButtonEvent, Dispatch, HandlerId};
pub use double_tap::{BackOutcome, DoubleTapExit, EXIT_PROMPT_MESSAGE, NavigationHost, PromptId};
