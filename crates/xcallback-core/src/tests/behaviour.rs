//! Behaviour-driven tests for x-callback-url exchanges.

use std::cell::RefCell;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use xcallback_config::Config;

use crate::codec;
use crate::composer::Completion;
use crate::engine::XCallbackEngine;
use crate::error::{FailureReason, XCallbackError};
use crate::launcher::{Launcher, RecordingLauncher};
use crate::request::XCallbackRequest;
use crate::response::XCallbackResponse;

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

/// State shared across BDD steps.
#[derive(Default)]
struct TestWorld {
    launcher: Arc<RecordingLauncher>,
    engine: Option<XCallbackEngine>,
    outcome: Option<Result<(), XCallbackError>>,
}

impl TestWorld {
    fn engine(&self) -> &XCallbackEngine {
        self.engine.as_ref().expect("engine configured")
    }

    fn engine_mut(&mut self) -> &mut XCallbackEngine {
        self.engine.as_mut().expect("engine configured")
    }

    fn last_opened(&self) -> XCallbackRequest {
        let opened = self.launcher.opened();
        let url = opened.last().expect("a url was opened");
        codec::decode(url).expect("opened url decodes")
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

fn build_engine(world: &RefCell<TestWorld>, config: Config) {
    let mut w = world.borrow_mut();
    let launcher = Arc::clone(&w.launcher) as Arc<dyn Launcher>;
    w.engine = Some(XCallbackEngine::with_shared_launcher(config, launcher));
}

fn register_responding(world: &RefCell<TestWorld>, action: &str, response: XCallbackResponse) {
    world.borrow_mut().engine_mut().register_action_handler(
        action,
        move |_: XCallbackRequest, completion: Completion| {
            completion.complete(response.clone());
        },
    );
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("an engine for application {name}")]
fn given_engine(world: &RefCell<TestWorld>, name: String) {
    build_engine(world, Config::default().with_source_app(strip_quotes(&name)));
}

#[given("a strict engine for application {name}")]
fn given_strict_engine(world: &RefCell<TestWorld>, name: String) {
    let config = Config::default()
        .with_source_app(strip_quotes(&name))
        .with_required_source_app(true);
    build_engine(world, config);
}

#[given("the launcher reports every scheme as unreachable")]
fn given_unreachable(world: &RefCell<TestWorld>) {
    world.borrow().launcher.set_reachable(false);
}

#[given("a handler for action {action} that succeeds with {key} set to {value}")]
fn given_succeeding_handler(world: &RefCell<TestWorld>, action: String, key: String, value: String) {
    let response = XCallbackResponse::success([(strip_quotes(&key), strip_quotes(&value))]);
    register_responding(world, strip_quotes(&action), response);
}

#[given("a handler for action {action} that fails with code {code} and message {message}")]
fn given_failing_handler(world: &RefCell<TestWorld>, action: String, code: i32, message: String) {
    let response = XCallbackResponse::error(code, strip_quotes(&message));
    register_responding(world, strip_quotes(&action), response);
}

#[given("a handler for action {action} that cancels")]
fn given_cancelling_handler(world: &RefCell<TestWorld>, action: String) {
    register_responding(world, strip_quotes(&action), XCallbackResponse::cancel());
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the engine sends action {action} to scheme {scheme} with {key} set to {value}")]
fn when_send(world: &RefCell<TestWorld>, action: String, scheme: String, key: String, value: String) {
    let mut w = world.borrow_mut();
    let mut request = w
        .engine()
        .request(strip_quotes(&scheme), strip_quotes(&action));
    request.add_parameter(strip_quotes(&key), strip_quotes(&value));
    let outcome = w.engine().send(&request).map(drop);
    w.outcome = Some(outcome);
}

#[when("the engine receives {url}")]
fn when_receive(world: &RefCell<TestWorld>, url: String) {
    let mut w = world.borrow_mut();
    let outcome = w.engine().handle(strip_quotes(&url));
    w.outcome = Some(outcome);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the operation succeeds")]
fn then_succeeds(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let outcome = w.outcome.as_ref().expect("no outcome captured");
    assert!(outcome.is_ok(), "expected success, got {outcome:?}");
}

#[then("the operation fails with code {code}")]
fn then_fails_with(world: &RefCell<TestWorld>, code: i32) {
    let w = world.borrow();
    let error = w
        .outcome
        .as_ref()
        .expect("no outcome captured")
        .as_ref()
        .expect_err("expected failure but got success");
    assert_eq!(error.code(), code, "unexpected failure: {error}");
}

#[then("the launcher opened {count} url(s)")]
fn then_opened_count(world: &RefCell<TestWorld>, count: usize) {
    assert_eq!(world.borrow().launcher.open_count(), count);
}

#[then("the last opened url targets scheme {scheme} with action {action}")]
fn then_last_target(world: &RefCell<TestWorld>, scheme: String, action: String) {
    let opened = world.borrow().last_opened();
    assert_eq!(opened.target_scheme(), strip_quotes(&scheme));
    assert_eq!(opened.action(), strip_quotes(&action));
}

#[then("the last opened url has {key} set to {value}")]
fn then_last_parameter(world: &RefCell<TestWorld>, key: String, value: String) {
    let opened = world.borrow().last_opened();
    assert_eq!(opened.parameter(strip_quotes(&key)), Some(strip_quotes(&value)));
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/callback_exchange.feature",
    name = "Sending a request to an installed application"
)]
fn send_to_installed(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/callback_exchange.feature",
    name = "Sending to an application that is not installed"
)]
fn send_to_missing(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/callback_exchange.feature",
    name = "A handled request answers on its success return"
)]
fn success_return(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/callback_exchange.feature",
    name = "A failing handler answers on its error return"
)]
fn error_return(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/callback_exchange.feature",
    name = "A cancelled request answers on its cancel return"
)]
fn cancel_return(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/callback_exchange.feature",
    name = "A request without a return url launches nothing"
)]
fn no_return(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/callback_exchange.feature",
    name = "An unknown action is rejected"
)]
fn unknown_action(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/callback_exchange.feature",
    name = "A url without an action is rejected"
)]
fn missing_action(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/callback_exchange.feature",
    name = "Anonymous callers are rejected when a source is required"
)]
fn anonymous_caller(world: RefCell<TestWorld>) {
    drop(world);
}
