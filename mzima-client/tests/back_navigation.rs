//! Back-button routing through the dispatcher into the double-tap handler.

use client::navigation::{BackOutcome, Dispatch, EXIT_PROMPT_MESSAGE, PromptId};
use client::{BackButtonDispatcher, BackButtonEvent, DoubleTapExit, NavigationHost};
use shared::config::ClientConfig;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Default)]
struct Router {
    stack: RefCell<Vec<String>>,
    events: RefCell<Vec<String>>,
}

impl Router {
    fn at(route: &str) -> Self {
        let router = Self::default();
        router.stack.borrow_mut().push(route.to_string());
        router
    }

    fn push(&self, route: &str) {
        self.stack.borrow_mut().push(route.to_string());
    }

    fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl NavigationHost for Router {
    fn can_go_back(&self) -> bool {
        self.stack.borrow().len() > 1
    }

    fn current_url(&self) -> String {
        self.stack.borrow().last().cloned().unwrap_or_default()
    }

    fn navigate_back_in_app(&self) {
        self.stack.borrow_mut().pop();
        self.events.borrow_mut().push("back".to_string());
    }

    fn history_back(&self) {
        self.events.borrow_mut().push("history".to_string());
    }

    fn exit_app(&self) {
        self.events.borrow_mut().push("exit".to_string());
    }

    fn present_exit_prompt(&self, _prompt: PromptId, message: &str, duration: Duration) {
        assert_eq!(message, EXIT_PROMPT_MESSAGE);
        assert_eq!(duration, Duration::from_millis(2000));
        self.events.borrow_mut().push("prompt".to_string());
    }
}

#[test]
fn deployment_route_without_history_exits_on_second_press() {
    let router = Router::at("/deployment");
    let mut exit = DoubleTapExit::new(&ClientConfig::default());

    assert!(matches!(exit.handle(&router), BackOutcome::PromptShown(_)));
    assert_eq!(exit.handle(&router), BackOutcome::Exited);
    assert_eq!(router.events(), vec!["prompt", "exit"]);
}

#[test]
fn history_on_other_routes_never_arms_exit() {
    let router = Router::at("/");
    router.push("/feed");
    router.push("/feed/12");
    let mut exit = DoubleTapExit::new(&ClientConfig::default());

    assert_eq!(exit.handle(&router), BackOutcome::InAppBack);
    assert_eq!(exit.taps(), 0);
    assert_eq!(exit.handle(&router), BackOutcome::InAppBack);
    assert_eq!(exit.taps(), 0);
    assert_eq!(router.current_url(), "/");

    assert!(matches!(exit.handle(&router), BackOutcome::PromptShown(_)));
    assert_eq!(exit.taps(), 1);
}

#[test]
fn configured_exit_routes_replace_defaults() {
    let config = ClientConfig {
        exit_routes: vec!["/map".to_string()],
        ..ClientConfig::default()
    };
    let router = Router::at("/deployment");
    let mut exit = DoubleTapExit::new(&config);

    assert_eq!(exit.handle(&router), BackOutcome::HistoryBack);
    assert_eq!(exit.taps(), 0);
}

#[test]
fn dispatcher_routes_each_press_once() {
    let router = Rc::new(Router::at("/"));
    let exit = Rc::new(RefCell::new(DoubleTapExit::new(&ClientConfig::default())));
    let mut dispatcher = BackButtonDispatcher::new();

    let fallback = Rc::new(RefCell::new(0));
    let fallback_count = fallback.clone();
    dispatcher.subscribe_with_priority(0, move |_: &BackButtonEvent| {
        *fallback_count.borrow_mut() += 1;
    });
    let handler = {
        let router = router.clone();
        let exit = exit.clone();
        dispatcher.subscribe_with_priority(10, move |_: &BackButtonEvent| {
            exit.borrow_mut().handle(&*router);
        })
    };

    assert_eq!(
        dispatcher.dispatch(BackButtonEvent { sequence: 1 }),
        Dispatch::Handled(handler)
    );
    assert_eq!(
        dispatcher.dispatch(BackButtonEvent { sequence: 1 }),
        Dispatch::Duplicate
    );
    assert_eq!(exit.borrow().taps(), 1);

    dispatcher.dispatch(BackButtonEvent { sequence: 2 });
    assert_eq!(router.events(), vec!["prompt", "exit"]);
    assert_eq!(*fallback.borrow(), 0);
}
