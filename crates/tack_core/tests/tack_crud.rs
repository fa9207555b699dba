use chrono::{Duration, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::rc::Rc;
use tack_core::{
    open_service, open_store, BoardQuery, CompletionOutcome, JsonTackRepository, ServiceError,
    TackConfig, TackId, TackKind, TackService,
};

fn service_in(dir: &tempfile::TempDir) -> TackService<JsonTackRepository> {
    open_service(&TackConfig::with_root(dir.path())).unwrap()
}

#[test]
fn added_tack_is_found_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let now = Utc::now();

    let created = service.pin("/a", "remember the key rotation", now).unwrap();
    let found = service.find(created.tack.id.as_str()).unwrap();
    assert_eq!(found, created);
    assert_eq!(found.tack.kind, TackKind::Pin);
}

#[test]
fn todo_then_done_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let created_at = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();

    let todo = service.todo("/a", "fix bug", created_at).unwrap();
    let listed = service.list_here("/a");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].kind, TackKind::Todo);
    assert!(!listed[0].done);

    let done_at = created_at + Duration::hours(3);
    let completion = service.complete(todo.tack.id.as_str(), done_at).unwrap();
    assert_eq!(completion.outcome, CompletionOutcome::Completed);
    assert!(completion.tack.tack.done);
    assert_eq!(completion.tack.tack.done_at, Some(done_at));
    assert_eq!(completion.tack.tack.created_at, created_at);

    let reloaded = service_in(&dir);
    let stored = reloaded.find(todo.tack.id.as_str()).unwrap();
    assert!(stored.tack.done);
    assert_eq!(stored.tack.done_at, Some(done_at));
}

#[test]
fn completing_twice_keeps_first_done_at_and_does_not_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let now = Utc::now();
    let todo = service.todo("/a", "once", now).unwrap();
    let id = todo.tack.id.as_str().to_string();

    let first = service.complete(&id, now + Duration::minutes(1)).unwrap();
    let bytes_after_first = fs::read(dir.path().join("tacks.json")).unwrap();
    let second = service.complete(&id, now + Duration::minutes(9)).unwrap();

    assert_eq!(second.outcome, CompletionOutcome::AlreadyDone);
    assert_eq!(second.tack.tack.done_at, first.tack.tack.done_at);
    assert_eq!(
        fs::read(dir.path().join("tacks.json")).unwrap(),
        bytes_after_first
    );
}

#[test]
fn completing_a_pin_fails_without_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let warn = service.warn("/a", "do not deploy", Utc::now()).unwrap();
    let before = fs::read(dir.path().join("tacks.json")).unwrap();

    let err = service.complete(warn.tack.id.as_str(), Utc::now()).unwrap_err();
    assert!(
        matches!(err, ServiceError::NotATodo { kind: TackKind::Warn, .. }),
        "unexpected: {err}"
    );
    assert_eq!(fs::read(dir.path().join("tacks.json")).unwrap(), before);
    assert!(!service.find(warn.tack.id.as_str()).unwrap().tack.done);
}

#[test]
fn remove_drops_tack_and_count_decreases_by_one() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let now = Utc::now();
    let keep = service.pin("/a", "keep", now).unwrap();
    let drop_me = service.todo("/a", "drop", now).unwrap();
    service.warn("/b", "other", now).unwrap();
    let total_before = service.board(BoardQuery::default(), now).summary.total_tacks;

    let removed = service.remove(drop_me.tack.id.as_str()).unwrap();
    assert_eq!(removed.tack.message, "drop");
    assert!(matches!(
        service.find(drop_me.tack.id.as_str()),
        Err(ServiceError::NotFound(_))
    ));
    assert_eq!(
        service.board(BoardQuery::default(), now).summary.total_tacks,
        total_before - 1
    );
    assert_eq!(service.list_here("/a"), vec![keep.tack]);
}

#[test]
fn removing_last_tack_drops_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let only = service.pin("/solo", "alone", Utc::now()).unwrap();

    service.remove(only.tack.id.as_str()).unwrap();
    assert!(service.directories().is_empty());
    assert!(service.list_here("/solo").is_empty());
}

#[test]
fn two_directories_list_their_own_notes() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let now = Utc::now();
    let work = service.pin("/work", "standup at 10", now).unwrap();
    let home = service.pin("/home", "water plants", now).unwrap();

    assert_eq!(
        service.directories(),
        vec!["/home".to_string(), "/work".to_string()]
    );
    assert_eq!(service.list_here("/work"), vec![work.tack]);
    assert_eq!(service.list_here("/home"), vec![home.tack]);
    assert!(service.list_here("/elsewhere").is_empty());
}

#[test]
fn remove_unknown_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let before = fs::read(dir.path().join("tacks.json")).unwrap();

    let err = service.remove("beef").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref id) if id.as_str() == "beef"));
    assert_eq!(fs::read(dir.path().join("tacks.json")).unwrap(), before);
}

#[test]
fn arbitrary_input_is_reported_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let before = fs::read(dir.path().join("tacks.json")).unwrap();

    let err = service.remove("hello").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref id) if id == "hello"));
    assert!(err.to_string().contains("4 hex characters"));
    assert!(matches!(
        service.complete("12345", Utc::now()),
        Err(ServiceError::NotFound(ref id)) if id == "12345"
    ));
    assert!(matches!(service.remove("   "), Err(ServiceError::NotFound(_))));
    assert_eq!(fs::read(dir.path().join("tacks.json")).unwrap(), before);
}

#[test]
fn hand_edited_ids_match_literally() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("tacks.json"),
        r#"{
  "tacks": {
    "/a": [
      {"id": "AB12", "kind": "pin", "message": "upper", "created_at": "2026-01-01T00:00:00Z"},
      {"id": "abcde", "kind": "todo", "message": "long", "created_at": "2026-01-01T00:00:00Z"}
    ]
  }
}"#,
    )
    .unwrap();
    let mut service = service_in(&dir);

    assert!(matches!(service.remove("ab12"), Err(ServiceError::NotFound(_))));
    let removed = service.remove(" AB12 ").unwrap();
    assert_eq!(removed.tack.message, "upper");

    let completion = service.complete("abcde", Utc::now()).unwrap();
    assert_eq!(completion.outcome, CompletionOutcome::Completed);
    service.remove("abcde").unwrap();
    assert!(service.list_here("/a").is_empty());
}

#[test]
fn blank_messages_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);

    let err = service.pin("/a", "   ", Utc::now()).unwrap_err();
    assert!(matches!(err, ServiceError::EmptyMessage));
    assert!(service.directories().is_empty());
}

#[test]
fn colliding_ids_are_redrawn() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tacks.json");
    let ids: Rc<RefCell<VecDeque<&str>>> =
        Rc::new(RefCell::new(VecDeque::from(["aaaa", "aaaa", "aaaa", "bbbb"])));
    let source = Rc::clone(&ids);
    let mut service = TackService::with_id_source(
        JsonTackRepository::new(open_store(&path).unwrap()),
        move || TackId::parse(source.borrow_mut().pop_front().unwrap_or("ffff")).unwrap(),
    );
    let now = Utc::now();

    let first = service.pin("/a", "first", now).unwrap();
    let second = service.pin("/a", "second", now).unwrap();
    assert_eq!(first.tack.id.as_str(), "aaaa");
    assert_eq!(second.tack.id.as_str(), "bbbb");
    assert!(ids.borrow().is_empty());
}

#[test]
fn exhausted_id_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tacks.json");
    let mut service = TackService::with_id_source(
        JsonTackRepository::new(open_store(&path).unwrap()),
        || TackId::parse("0000").unwrap(),
    );
    service.pin("/a", "takes the only id", Utc::now()).unwrap();

    let err = service.pin("/a", "no room", Utc::now()).unwrap_err();
    assert!(matches!(err, ServiceError::IdSpaceExhausted));
}

#[test]
fn stale_board_excludes_directories_without_old_open_todos() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let now = Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap();
    service
        .todo("/project", "old todo", now - Duration::days(10))
        .unwrap();
    service
        .pin("/notes", "old pin", now - Duration::days(10))
        .unwrap();
    service.todo("/fresh", "new todo", now - Duration::days(1)).unwrap();

    let view = service.board(
        BoardQuery {
            stale_after_days: Some(7),
        },
        now,
    );
    assert_eq!(view.sections.len(), 1);
    assert_eq!(view.sections[0].directory, "/project");
    assert_eq!(view.summary.open_todos, 2);
    assert_eq!(view.summary.directories, 3);
}

#[test]
fn counts_here_feed_the_quiet_summary() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let now = Utc::now();
    service.pin("/a", "p", now).unwrap();
    let todo = service.todo("/a", "t", now).unwrap();
    service.todo("/a", "t2", now).unwrap();
    service.warn("/a", "w", now).unwrap();
    service.complete(todo.tack.id.as_str(), now).unwrap();

    let counts = service.counts_here("/a");
    assert_eq!(
        (counts.pins, counts.open_todos, counts.warnings, counts.done),
        (1, 1, 1, 1)
    );
    assert!(service.counts_here("/b").is_empty());
}
