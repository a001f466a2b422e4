//! Crate-level integration and BDD tests.

use std::sync::Arc;

use crate::codec;
use crate::composer::Completion;
use crate::engine::XCallbackEngine;
use crate::launcher::{Launcher, RecordingLauncher};
use crate::request::XCallbackRequest;
use crate::response::XCallbackResponse;
use xcallback_config::Config;

mod behaviour;

#[test]
fn round_trip_between_two_engines() {
    let notes_launcher = Arc::new(RecordingLauncher::new());
    let tasks_launcher = Arc::new(RecordingLauncher::new());
    let notes = XCallbackEngine::with_shared_launcher(
        Config::default().with_source_app("Notes"),
        Arc::clone(&notes_launcher) as Arc<dyn Launcher>,
    );
    let mut tasks = XCallbackEngine::with_shared_launcher(
        Config::default().with_source_app("Tasks"),
        Arc::clone(&tasks_launcher) as Arc<dyn Launcher>,
    );
    tasks.register_action_handler("add", |request: XCallbackRequest, completion: Completion| {
        let title = request.parameter("title").unwrap_or_default().to_uppercase();
        completion.complete(XCallbackResponse::success([("title", title)]));
    });

    let mut request = notes.request("tasks", "add");
    request.add_parameter("title", "milk");
    request.add_x_success_action("notes", "added");
    let sent = notes.send(&request).expect("send");

    tasks.handle(&sent).expect("tasks handles add");

    let opened = tasks_launcher.opened();
    let returned = opened.first().expect("return launched");
    let decoded = codec::decode(returned).expect("return decodes");
    assert_eq!(decoded.target_scheme(), "notes");
    assert_eq!(decoded.action(), "added");
    assert_eq!(decoded.parameter("title"), Some("MILK"));
}
