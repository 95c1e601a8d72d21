//! # Mobile shell bootstrap
//!
//! Glue between the native host and the client core: waits for the
//! platform, wires connection notices and the double-tap exit handler on
//! hybrid shells, and asks old iOS devices to update.

pub mod connection;
pub mod device;

pub use connection::{CONNECTION_LOST, CONNECTION_RESTORED, ConnectionNotifier};
pub use device::{DeviceInfo, PlatformKind, parse_os_version, requires_os_update};

use crate::navigation::{
    BackButtonDispatcher, BackButtonEvent, Dispatch, DoubleTapExit, HandlerId, NavigationHost,
    PromptId,
};
use async_trait::async_trait;
use shared::config::ClientConfig;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Priority of the double-tap exit handler in the back-button registry.
pub const EXIT_HANDLER_PRIORITY: i32 = 10;

/// Native capabilities the shell relies on.
#[async_trait(?Send)]
pub trait ShellPlatform: NavigationHost {
    /// Resolves once the native layer is ready.
    async fn ready(&self);

    /// Platform the shell runs on.
    fn kind(&self) -> PlatformKind;

    /// `true` when running inside a native wrapper rather than a browser.
    fn is_hybrid(&self) -> bool;

    /// Device details, available once ready.
    async fn device_info(&self) -> DeviceInfo;

    /// Shows a confirm dialog and resolves to the user's answer.
    async fn confirm(&self, title: &str, message: &str) -> bool;

    /// Opens the system software update screen.
    async fn open_software_update_settings(&self);

    /// Network status stream, `true` while online.
    fn network_status(&self) -> watch::Receiver<bool>;

    /// Shows a transient notice.
    async fn show_notice(&self, message: &str);
}

/// A started shell.
///
/// Owns the exit handler registration; dropping the shell removes it from
/// the dispatcher.
pub struct MobileShell<P: ShellPlatform + 'static> {
    platform: Rc<P>,
    dispatcher: Rc<RefCell<BackButtonDispatcher>>,
    exit: Rc<RefCell<DoubleTapExit>>,
    exit_handler: Option<HandlerId>,
    connection: Option<ConnectionNotifier>,
}

impl<P: ShellPlatform + 'static> std::fmt::Debug for MobileShell<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MobileShell")
            .field("kind", &self.platform.kind())
            .field("exit_handler", &self.exit_handler)
            .field("connection", &self.connection.is_some())
            .finish_non_exhaustive()
    }
}

impl<P: ShellPlatform + 'static> MobileShell<P> {
    /// Waits for the platform, installs the hybrid-only hooks, then runs the
    /// OS version check.
    pub async fn start(
        platform: Rc<P>,
        dispatcher: Rc<RefCell<BackButtonDispatcher>>,
        config: &ClientConfig,
    ) -> Self {
        platform.ready().await;
        let kind = platform.kind();
        let hybrid = platform.is_hybrid();
        info!(%kind, hybrid, "platform ready");

        let mut shell = Self {
            exit: Rc::new(RefCell::new(DoubleTapExit::new(config))),
            exit_handler: None,
            connection: None,
            platform,
            dispatcher,
        };

        if hybrid {
            shell.connection = Some(ConnectionNotifier::new(shell.platform.network_status()));
            if kind == PlatformKind::Android {
                shell.install_exit_handler();
            }
        }

        shell.check_os_version(&config.minimum_ios_version).await;
        shell
    }

    fn install_exit_handler(&mut self) {
        let platform = Rc::clone(&self.platform);
        let exit = Rc::clone(&self.exit);
        let id = self.dispatcher.borrow_mut().subscribe_with_priority(
            EXIT_HANDLER_PRIORITY,
            move |event: &BackButtonEvent| {
                let outcome = exit.borrow_mut().handle(&*platform);
                debug!(sequence = event.sequence, ?outcome, "back button handled");
            },
        );
        self.exit_handler = Some(id);
    }

    async fn check_os_version(&self, minimum: &str) {
        let info = self.platform.device_info().await;
        debug!(platform = %info.platform, os_version = %info.os_version, "device info");
        if !requires_os_update(&info, minimum) {
            return;
        }
        warn!(os_version = %info.os_version, minimum, "OS version below supported minimum");
        if self
            .platform
            .confirm(device::UPDATE_DIALOG_TITLE, device::UPDATE_DIALOG_MESSAGE)
            .await
        {
            self.platform.open_software_update_settings().await;
        }
    }

    /// The platform this shell drives.
    #[must_use]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Whether the double-tap exit handler is registered.
    #[must_use]
    pub fn has_exit_handler(&self) -> bool {
        self.exit_handler.is_some()
    }

    /// Current double-tap counter.
    #[must_use]
    pub fn exit_taps(&self) -> u8 {
        self.exit.borrow().taps()
    }

    /// Forwards a hardware back press to the dispatcher.
    pub fn back_button_pressed(&self, event: BackButtonEvent) -> Dispatch {
        self.dispatcher.borrow_mut().dispatch(event)
    }

    /// Called by the prompt owner when the exit prompt `prompt` went away
    /// unanswered. Returns `false` when a newer prompt has replaced it.
    pub fn exit_prompt_dismissed(&self, prompt: PromptId) -> bool {
        self.exit.borrow_mut().prompt_dismissed(prompt)
    }

    /// Shows a notice for every distinct network status until the status
    /// source closes. Does nothing on non-hybrid platforms.
    pub async fn run_connection_notices(&mut self) {
        let Some(connection) = self.connection.as_mut() else {
            return;
        };
        while let Some(notice) = connection.next_notice().await {
            self.platform.show_notice(notice).await;
        }
        debug!("network status source closed");
    }
}

impl<P: ShellPlatform + 'static> Drop for MobileShell<P> {
    fn drop(&mut self) {
        if let Some(id) = self.exit_handler.take() {
            if let Ok(mut dispatcher) = self.dispatcher.try_borrow_mut() {
                dispatcher.unsubscribe(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    struct FakePlatform {
        kind: PlatformKind,
        hybrid: bool,
        os_version: String,
        confirm_answer: bool,
        url: String,
        history: bool,
        network: RefCell<Option<watch::Sender<bool>>>,
        last_prompt: Cell<Option<PromptId>>,
        log: RefCell<Vec<String>>,
    }

    impl FakePlatform {
        fn new(kind: PlatformKind, hybrid: bool, os_version: &str) -> Self {
            Self {
                kind,
                hybrid,
                os_version: os_version.to_string(),
                confirm_answer: true,
                url: "/".to_string(),
                history: false,
                network: RefCell::new(Some(watch::channel(true).0)),
                last_prompt: Cell::new(None),
                log: RefCell::default(),
            }
        }

        fn record(&self, entry: impl Into<String>) {
            self.log.borrow_mut().push(entry.into());
        }

        fn set_online(&self, online: bool) {
            if let Some(sender) = self.network.borrow().as_ref() {
                sender.send_replace(online);
            }
        }

        fn close_network(&self) {
            self.network.borrow_mut().take();
        }

        fn log(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    impl NavigationHost for FakePlatform {
        fn can_go_back(&self) -> bool {
            self.history
        }

        fn current_url(&self) -> String {
            self.url.clone()
        }

        fn navigate_back_in_app(&self) {
            self.record("in_app_back");
        }

        fn history_back(&self) {
            self.record("history_back");
        }

        fn exit_app(&self) {
            self.record("exit");
        }

        fn present_exit_prompt(&self, prompt: PromptId, _message: &str, _duration: Duration) {
            self.last_prompt.set(Some(prompt));
            self.record("exit_prompt");
        }
    }

    #[async_trait(?Send)]
    impl ShellPlatform for FakePlatform {
        async fn ready(&self) {
            self.record("ready");
        }

        fn kind(&self) -> PlatformKind {
            self.kind
        }

        fn is_hybrid(&self) -> bool {
            self.hybrid
        }

        async fn device_info(&self) -> DeviceInfo {
            DeviceInfo {
                platform: self.kind,
                os_version: self.os_version.clone(),
            }
        }

        async fn confirm(&self, title: &str, _message: &str) -> bool {
            self.record(format!("confirm:{title}"));
            self.confirm_answer
        }

        async fn open_software_update_settings(&self) {
            self.record("settings");
        }

        fn network_status(&self) -> watch::Receiver<bool> {
            match self.network.borrow().as_ref() {
                Some(sender) => sender.subscribe(),
                None => watch::channel(false).1,
            }
        }

        async fn show_notice(&self, message: &str) {
            self.record(format!("notice:{message}"));
        }
    }

    type Dispatcher = Rc<RefCell<BackButtonDispatcher>>;

    async fn start(platform: FakePlatform) -> (MobileShell<FakePlatform>, Dispatcher) {
        let dispatcher = Rc::new(RefCell::new(BackButtonDispatcher::new()));
        let config = ClientConfig::default();
        let shell = MobileShell::start(Rc::new(platform), Rc::clone(&dispatcher), &config).await;
        (shell, dispatcher)
    }

    #[tokio::test]
    async fn android_hybrid_installs_exit_handler() {
        let (shell, dispatcher) = start(FakePlatform::new(PlatformKind::Android, true, "13")).await;
        assert!(shell.has_exit_handler());
        assert_eq!(dispatcher.borrow().handler_count(), 1);

        assert!(matches!(
            shell.back_button_pressed(BackButtonEvent { sequence: 1 }),
            Dispatch::Handled(_)
        ));
        assert_eq!(shell.exit_taps(), 1);
        shell.back_button_pressed(BackButtonEvent { sequence: 2 });
        assert_eq!(shell.platform().log(), vec!["ready", "exit_prompt", "exit"]);
        assert_eq!(shell.exit_taps(), 0);
    }

    #[tokio::test]
    async fn duplicate_event_does_not_double_tap() {
        let (shell, _dispatcher) = start(FakePlatform::new(PlatformKind::Android, true, "13")).await;
        shell.back_button_pressed(BackButtonEvent { sequence: 7 });
        assert_eq!(
            shell.back_button_pressed(BackButtonEvent { sequence: 7 }),
            Dispatch::Duplicate
        );
        assert_eq!(shell.exit_taps(), 1);
    }

    #[tokio::test]
    async fn prompt_dismissal_resets_counter() {
        let (shell, _dispatcher) = start(FakePlatform::new(PlatformKind::Android, true, "13")).await;
        shell.back_button_pressed(BackButtonEvent { sequence: 1 });
        let prompt = shell.platform().last_prompt.get().unwrap();
        assert!(shell.exit_prompt_dismissed(prompt));
        assert_eq!(shell.exit_taps(), 0);
    }

    #[tokio::test]
    async fn stale_dismissal_keeps_new_prompt_armed() {
        let (shell, _dispatcher) = start(FakePlatform::new(PlatformKind::Android, true, "13")).await;
        shell.back_button_pressed(BackButtonEvent { sequence: 1 });
        let first = shell.platform().last_prompt.get().unwrap();
        shell.exit_prompt_dismissed(first);
        shell.back_button_pressed(BackButtonEvent { sequence: 2 });

        assert!(!shell.exit_prompt_dismissed(first));
        assert_eq!(shell.exit_taps(), 1);
        shell.back_button_pressed(BackButtonEvent { sequence: 3 });
        assert_eq!(
            shell.platform().log(),
            vec!["ready", "exit_prompt", "exit_prompt", "exit"]
        );
    }

    #[tokio::test]
    async fn ios_and_web_skip_exit_handler() {
        let (ios, dispatcher) = start(FakePlatform::new(PlatformKind::Ios, true, "17.1")).await;
        assert!(!ios.has_exit_handler());
        assert_eq!(dispatcher.borrow().handler_count(), 0);

        let (web, dispatcher) = start(FakePlatform::new(PlatformKind::Android, false, "13")).await;
        assert!(!web.has_exit_handler());
        assert_eq!(dispatcher.borrow().handler_count(), 0);
    }

    #[tokio::test]
    async fn dropping_shell_unsubscribes() {
        let (shell, dispatcher) = start(FakePlatform::new(PlatformKind::Android, true, "13")).await;
        drop(shell);
        assert_eq!(dispatcher.borrow().handler_count(), 0);
    }

    #[tokio::test]
    async fn old_ios_is_asked_to_update() {
        let (shell, _dispatcher) = start(FakePlatform::new(PlatformKind::Ios, true, "16.4")).await;
        assert_eq!(
            shell.platform().log(),
            vec![
                "ready".to_string(),
                format!("confirm:{}", device::UPDATE_DIALOG_TITLE),
                "settings".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn declined_update_does_not_open_settings() {
        let mut platform = FakePlatform::new(PlatformKind::Ios, true, "15.0");
        platform.confirm_answer = false;
        let (shell, _dispatcher) = start(platform).await;
        assert!(!shell.platform().log().contains(&"settings".to_string()));
    }

    #[tokio::test]
    async fn connection_notices_follow_network_status() {
        let (mut shell, _dispatcher) = start(FakePlatform::new(PlatformKind::Android, true, "13")).await;
        let connection = shell.connection.as_mut().unwrap();
        assert_eq!(connection.next_notice().await, Some(CONNECTION_RESTORED));

        shell.platform().set_online(true);
        shell.platform().set_online(false);
        shell.platform().close_network();
        shell.run_connection_notices().await;

        assert_eq!(
            shell.platform().log(),
            vec!["ready", "notice:Connection lost"]
        );
    }

    #[tokio::test]
    async fn web_shell_has_no_connection_notices() {
        let (mut shell, _dispatcher) = start(FakePlatform::new(PlatformKind::Web, false, "")).await;
        shell.run_connection_notices().await;
        assert_eq!(shell.platform().log(), vec!["ready"]);
    }
}
