//! Unit tests for the request model.

use rstest::{fixture, rstest};

use super::*;
use crate::error::FailureReason;
use crate::params::{CANCEL_KEY, ERROR_KEY, SUCCESS_KEY};

#[fixture]
fn request() -> XCallbackRequest {
    XCallbackRequest::new("notes", "create")
}

#[rstest]
fn new_request_has_no_parameters(request: XCallbackRequest) {
    assert_eq!(request.target_scheme(), "notes");
    assert_eq!(request.action(), "create");
    assert!(request.parameters().is_empty());
    assert!(request.source_app().is_none());
}

#[rstest]
fn add_parameter_overwrites_existing_value(mut request: XCallbackRequest) {
    request.add_parameter("title", "Groceries");
    request.add_parameter("title", "Errands");
    assert_eq!(request.parameter("title"), Some("Errands"));
    assert_eq!(request.parameters().len(), 1);
}

#[rstest]
fn extend_parameters_merges_and_overwrites(mut request: XCallbackRequest) {
    request.add_parameter("title", "Groceries");
    request.extend_parameters([("title", "Errands"), ("folder", "Home")]);
    assert_eq!(request.parameter("title"), Some("Errands"));
    assert_eq!(request.parameter("folder"), Some("Home"));
}

#[rstest]
fn clones_are_independent(request: XCallbackRequest) {
    let mut copy = request.clone();
    copy.add_parameter("title", "Groceries");
    assert!(request.parameter("title").is_none());
}

#[rstest]
fn source_app_round_trips(mut request: XCallbackRequest) {
    request.set_source_app("Tasks");
    assert_eq!(request.source_app(), Some("Tasks"));
    assert_eq!(request.remove_source_app().as_deref(), Some("Tasks"));
    assert!(request.source_app().is_none());
}

#[rstest]
fn require_parameter_reports_missing_name(request: XCallbackRequest) {
    let error = request
        .require_parameter("title")
        .expect_err("title is absent");
    assert_eq!(error.code(), 1321);
    assert!(error.to_string().contains("title"));
}

#[rstest]
#[case::success(ReturnKind::Success, SUCCESS_KEY)]
#[case::error(ReturnKind::Error, ERROR_KEY)]
#[case::cancel(ReturnKind::Cancel, CANCEL_KEY)]
fn return_action_lifecycle(
    mut request: XCallbackRequest,
    #[case] kind: ReturnKind,
    #[case] key: &str,
) {
    assert!(request.return_request(kind).is_none());

    request.set_return_action(kind, "Tasks", "note-created");
    assert_eq!(
        request.parameter(key),
        Some("Tasks://x-callback-url/note-created")
    );

    let nested = request.return_request(kind).expect("return decodes");
    assert_eq!(nested.target_scheme(), "Tasks");
    assert_eq!(nested.action(), "note-created");
    assert!(nested.parameters().is_empty());

    assert!(request.remove_return_action(kind).is_some());
    assert!(request.parameters().is_empty());
}

#[rstest]
fn named_return_accessors_match_generic_ones(mut request: XCallbackRequest) {
    request.add_x_success_action("tasks", "done");
    request.add_x_error_action("tasks", "failed");
    request.add_x_cancel_action("tasks", "cancelled");
    assert_eq!(request.x_success().expect("success").action(), "done");
    assert_eq!(request.x_error().expect("error").action(), "failed");
    assert_eq!(request.x_cancel().expect("cancel").action(), "cancelled");

    request.remove_x_success_action();
    request.remove_x_error_action();
    request.remove_x_cancel_action();
    assert!(request.parameters().is_empty());
}

#[rstest]
#[case::success(SUCCESS_KEY)]
#[case::error(ERROR_KEY)]
#[case::cancel(CANCEL_KEY)]
fn undecodable_return_url_is_absent(mut request: XCallbackRequest, #[case] key: &str) {
    request.add_parameter(key, "^^Invalid^^");
    assert!(request.x_success().is_none());
    assert!(request.x_error().is_none());
    assert!(request.x_cancel().is_none());
}

#[test]
fn serialises_as_json_object() {
    let request = XCallbackRequest::new("notes", "create").with_parameter("title", "Groceries");
    let json = serde_json::to_value(&request).expect("request serialises");
    assert_eq!(json["target_scheme"], "notes");
    assert_eq!(json["action"], "create");
    assert_eq!(json["parameters"]["title"], "Groceries");
}
