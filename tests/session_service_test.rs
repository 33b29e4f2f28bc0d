//! Tests for SessionService: loading, navigation, reload and copy

use std::io;
use std::sync::{Arc, Mutex};

use rstest::rstest;

use theramatch::application::services::{
    Flow, SessionOptions, SessionService, Status, COPIED_MESSAGE, COPY_FAILED_MESSAGE,
    RELOADED_MESSAGE,
};
use theramatch::application::ApplicationError;
use theramatch::domain::{Action, Breadcrumb, DomainError, DuplicateIdPolicy, ViewBody};
use theramatch::infrastructure::traits::{Clipboard, DocumentSource};
use theramatch::util::testing;

const TREE: &str = r#"{
  "startNodeId": "q1",
  "metadata": {"version": "3", "lastUpdated": "2024-05-01"},
  "nodes": [
    {"id": "q1", "type": "question", "question": "Do you have a referral?",
     "answers": [{"label": "Yes", "next": "q2"}, {"label": "No", "next": "r2"}]},
    {"id": "q2", "type": "question", "question": "Is it urgent?", "help": "Within two weeks",
     "answers": [{"label": "Yes", "next": "r1"}, {"label": "No", "next": "r2"}]},
    {"id": "r1", "type": "result", "title": "Done", "bullets": ["do X"]},
    {"id": "r2", "type": "result", "title": "Wait",
     "links": [{"label": "Info", "url": "https://example.org"}]}
  ]
}"#;

/// Source serving whatever document is currently set
struct MockSource {
    content: Mutex<io::Result<String>>,
}

impl MockSource {
    fn new(content: &str) -> Arc<Self> {
        Arc::new(Self {
            content: Mutex::new(Ok(content.to_string())),
        })
    }

    fn set(&self, content: io::Result<String>) {
        *self.content.lock().unwrap() = content;
    }
}

impl DocumentSource for MockSource {
    fn fetch(&self, _location: &str) -> io::Result<String> {
        match &*self.content.lock().unwrap() {
            Ok(s) => Ok(s.clone()),
            Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
        }
    }
}

/// Clipboard recording writes, or denying them
struct MockClipboard {
    deny: bool,
    written: Mutex<Vec<String>>,
}

impl MockClipboard {
    fn new(deny: bool) -> Arc<Self> {
        Arc::new(Self {
            deny,
            written: Mutex::new(Vec::new()),
        })
    }
}

impl Clipboard for MockClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        if self.deny {
            return Err("permission denied".to_string());
        }
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn session_with(source: Arc<MockSource>, clipboard: Arc<MockClipboard>) -> SessionService {
    testing::init_test_setup();
    SessionService::new(source, clipboard, SessionOptions::new("tree.json"))
}

fn loaded(content: &str) -> SessionService {
    let mut session = session_with(MockSource::new(content), MockClipboard::new(false));
    session.load().expect("load tree");
    session
}

#[test]
fn given_valid_document_when_loading_then_current_is_start_node_with_empty_history() {
    let session = loaded(TREE);

    assert_eq!(session.current_node().unwrap().id, "q1");
    assert!(session.navigator().unwrap().history().is_empty());
    assert_eq!(session.status(), &Status::Idle);

    let view = session.view().unwrap();
    assert_eq!(view.breadcrumbs, vec!["Start".to_string()]);
    assert!(!view.back_enabled);
    assert_eq!(view.version, "3");
    assert_eq!(view.last_updated, "2024-05-01");
}

#[test]
fn given_nothing_loaded_when_navigating_then_not_loaded_error() {
    let mut session = session_with(MockSource::new(TREE), MockClipboard::new(false));

    assert!(!session.is_loaded());
    assert!(matches!(session.view(), Err(ApplicationError::NotLoaded)));
    assert!(matches!(
        session.select_answer(0),
        Err(ApplicationError::NotLoaded)
    ));
}

#[rstest]
#[case(r#"{"nodes": []}"#)]
#[case(r#"{"startNodeId": "q1"}"#)]
#[case(r#"{"startNodeId": "", "nodes": []}"#)]
#[case(r#"["q1"]"#)]
#[case("not json")]
fn given_malformed_document_when_loading_then_invalid_format(#[case] content: &str) {
    let mut session = session_with(MockSource::new(content), MockClipboard::new(false));

    let err = session.load().unwrap_err();

    assert!(
        matches!(err, ApplicationError::Domain(DomainError::InvalidFormat { .. })),
        "got {err:?}"
    );
    assert!(session.status().is_error());
}

#[test]
fn given_unreachable_source_when_loading_then_network_error() {
    let source = MockSource::new(TREE);
    source.set(Err(io::Error::new(io::ErrorKind::NotFound, "missing")));
    let mut session = session_with(source, MockClipboard::new(false));

    let err = session.load().unwrap_err();

    assert!(matches!(err, ApplicationError::Network { .. }));
}

#[test]
fn given_answers_when_reaching_result_then_summary_matches_transcript() {
    let mut session = loaded(TREE);

    session.select_answer_by_label("Yes").unwrap();
    session.select_answer_by_label("Yes").unwrap();

    let view = session.view().unwrap();
    assert_eq!(view.breadcrumbs, vec!["Start", "Yes", "Yes"]);
    match view.body {
        ViewBody::Result {
            title,
            bullets,
            path,
            ..
        } => {
            assert_eq!(title, "Done");
            assert_eq!(bullets, vec!["do X".to_string()]);
            assert_eq!(path, "Start > Yes > Yes");
        }
        other => panic!("expected result, got {other:?}"),
    }
    assert_eq!(
        session.summary_text().unwrap(),
        "TheraMatch – Summary\nStart > Yes > Yes\n\nDone\n- do X"
    );
}

#[test]
fn given_history_when_going_back_then_previous_node_and_shorter_history() {
    let mut session = loaded(TREE);
    session.select_answer(0).unwrap();

    assert!(session.go_back().unwrap());
    assert_eq!(session.navigator().unwrap().current_node_id(), "q1");
    assert!(!session.go_back().unwrap());
}

#[test]
fn given_deep_history_when_jumping_to_breadcrumb_then_history_truncated() {
    let mut session = loaded(TREE);
    session.select_answer(0).unwrap();
    session.select_answer(1).unwrap();

    session.jump_to_breadcrumb(Breadcrumb::Step(0)).unwrap();

    let nav = session.navigator().unwrap();
    assert_eq!(nav.current_node_id(), "q2");
    assert_eq!(nav.history().len(), 1);
}

#[test]
fn given_breadcrumb_out_of_range_when_jumping_then_error_and_state_unchanged() {
    let mut session = loaded(TREE);
    session.select_answer(0).unwrap();

    let err = session.jump_to_breadcrumb(Breadcrumb::Step(5)).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::BreadcrumbOutOfRange { index: 5, len: 1 })
    ));
    assert_eq!(session.navigator().unwrap().current_node_id(), "q2");
}

#[test]
fn given_unknown_label_when_selecting_then_answer_not_found() {
    let mut session = loaded(TREE);

    let err = session.select_answer_by_label("Maybe").unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::AnswerNotFound { .. })
    ));
}

#[test]
fn given_navigation_when_reloading_then_reset_to_start_with_info_status() {
    let source = MockSource::new(TREE);
    let mut session = session_with(Arc::clone(&source), MockClipboard::new(false));
    session.load().unwrap();
    session.select_answer(0).unwrap();

    session.reload().unwrap();

    assert_eq!(session.navigator().unwrap().current_node_id(), "q1");
    assert!(session.navigator().unwrap().history().is_empty());
    assert_eq!(
        session.take_status(),
        Status::Info(RELOADED_MESSAGE.to_string())
    );
    assert_eq!(session.status(), &Status::Idle);
}

#[test]
fn given_broken_document_when_reloading_then_previous_tree_and_position_kept() {
    let source = MockSource::new(TREE);
    let mut session = session_with(Arc::clone(&source), MockClipboard::new(false));
    session.load().unwrap();
    session.select_answer(0).unwrap();
    source.set(Ok(r#"{"nodes": []}"#.to_string()));

    let flow = session.apply(Action::Reload).unwrap();

    assert_eq!(flow, Flow::Continue);
    assert!(session.status().is_error());
    assert_eq!(session.navigator().unwrap().current_node_id(), "q2");
    assert_eq!(session.navigator().unwrap().history().len(), 1);
}

#[test]
fn given_unknown_node_type_when_rendering_then_error_view() {
    let session = loaded(r#"{"startNodeId":"x","nodes":[{"id":"x","type":"info"}]}"#);

    match session.view().unwrap().body {
        ViewBody::Error { message } => assert_eq!(message, "Unknown node type: info"),
        other => panic!("expected error view, got {other:?}"),
    }
}

#[test]
fn given_dangling_next_when_following_then_error_view_and_back_recovers() {
    let mut session = loaded(
        r#"{"startNodeId":"q1","nodes":[
            {"id":"q1","type":"question","answers":[{"label":"Go","next":"nowhere"}]}]}"#,
    );

    session.select_answer(0).unwrap();
    let view = session.view().unwrap();

    assert!(matches!(view.body, ViewBody::Error { .. }));
    assert!(view.back_enabled);
    assert!(session.go_back().unwrap());
    assert!(matches!(
        session.view().unwrap().body,
        ViewBody::Question { .. }
    ));
}

#[test]
fn given_duplicate_ids_and_reject_policy_when_loading_then_error() {
    let mut options = SessionOptions::new("tree.json");
    options.duplicate_ids = DuplicateIdPolicy::Reject;
    let mut session = SessionService::new(
        MockSource::new(
            r#"{"startNodeId":"a","nodes":[{"id":"a","type":"result"},{"id":"a","type":"result"}]}"#,
        ),
        MockClipboard::new(false),
        options,
    );

    let err = session.load().unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DuplicateNodeId(_))
    ));
}

#[test]
fn given_clipboard_when_copying_then_summary_written_and_info_status() {
    let clipboard = MockClipboard::new(false);
    let mut session = session_with(MockSource::new(TREE), Arc::clone(&clipboard));
    session.load().unwrap();
    session.select_answer_by_label("No").unwrap();

    let flow = session.apply(Action::CopySummary).unwrap();

    assert_eq!(flow, Flow::Continue);
    assert_eq!(
        session.take_status(),
        Status::Info(COPIED_MESSAGE.to_string())
    );
    let written = clipboard.written.lock().unwrap();
    assert_eq!(
        written.as_slice(),
        ["TheraMatch – Summary\nStart > No\n\nWait\nInfo: https://example.org"]
    );
}

#[test]
fn given_denied_clipboard_when_copying_then_status_only_and_navigation_unchanged() {
    let mut session = session_with(MockSource::new(TREE), MockClipboard::new(true));
    session.load().unwrap();
    session.select_answer(0).unwrap();

    assert!(!session.copy_summary());

    assert_eq!(
        session.status(),
        &Status::Error(COPY_FAILED_MESSAGE.to_string())
    );
    assert_eq!(session.navigator().unwrap().current_node_id(), "q2");
}

#[rstest]
#[case(Action::Answer(0), "q2")]
#[case(Action::Answer(1), "r2")]
#[case(Action::Restart, "q1")]
#[case(Action::Back, "q1")]
#[case(Action::Breadcrumb(Breadcrumb::Start), "q1")]
fn given_action_when_applying_then_expected_node(#[case] action: Action, #[case] expected: &str) {
    let mut session = loaded(TREE);

    assert_eq!(session.apply(action).unwrap(), Flow::Continue);
    assert_eq!(session.navigator().unwrap().current_node_id(), expected);
}

#[test]
fn given_quit_when_applying_then_flow_quit() {
    let mut session = loaded(TREE);

    assert_eq!(session.apply(Action::Quit).unwrap(), Flow::Quit);
}

/// Source that logs each fetch into a shared event list
struct LoggingSource {
    events: Arc<Mutex<Vec<String>>>,
}

impl DocumentSource for LoggingSource {
    fn fetch(&self, location: &str) -> io::Result<String> {
        self.events.lock().unwrap().push(format!("fetch {location}"));
        Ok(TREE.to_string())
    }
}

fn logging_session(events: &Arc<Mutex<Vec<String>>>) -> SessionService {
    testing::init_test_setup();
    let listener_events = Arc::clone(events);
    SessionService::new(
        Arc::new(LoggingSource {
            events: Arc::clone(events),
        }),
        MockClipboard::new(false),
        SessionOptions::new("tree.json"),
    )
    .on_loading(move |location| {
        listener_events
            .lock()
            .unwrap()
            .push(format!("loading {location}"));
    })
}

#[test]
fn given_loading_listener_when_loading_then_notified_before_fetch() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut session = logging_session(&events);

    session.load().unwrap();

    assert_eq!(
        events.lock().unwrap().as_slice(),
        ["loading tree.json", "fetch tree.json"]
    );
    assert_eq!(session.status(), &Status::Idle);
}

#[test]
fn given_loading_listener_when_reload_action_then_notified_before_each_fetch() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut session = logging_session(&events);
    session.load().unwrap();

    session.apply(Action::Reload).unwrap();

    assert_eq!(
        events.lock().unwrap().as_slice(),
        [
            "loading tree.json",
            "fetch tree.json",
            "loading tree.json",
            "fetch tree.json"
        ]
    );
}
