use super::SessionManager;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::Session;
use crate::domain::models::DEFAULT_SESSION_NAME;

fn session_fixture(name: &str, timestamp: i64) -> Session {
    let mut session = Session::new();
    session.name = name.to_string();
    session.timestamp = timestamp;
    session.is_new = false;
    return session;
}

#[test]
fn it_switches_to_an_existing_session() {
    let mut sessions = vec![session_fixture("a", 1), session_fixture("b", 2)];
    let mut message = Message::new(Author::User, "hello");
    message.timestamp = 3;
    sessions[1].messages.push(message);
    let target = sessions[1].id.to_string();

    let (current_id, messages) = SessionManager::switch_to(&target, &mut sessions);

    assert_eq!(current_id, target);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "hello");
    assert_eq!(sessions.len(), 2);
}

#[test]
fn it_self_heals_on_an_unknown_session() {
    let mut sessions = vec![session_fixture("a", 1)];

    let (current_id, messages) = SessionManager::switch_to("does-not-exist", &mut sessions);

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, current_id);
    assert!(messages.is_empty());
    assert!(sessions[0].is_new);
}

#[test]
fn it_supersedes_stale_entries_on_switch() {
    let mut sessions: Vec<Session> = vec![];

    let (current_id, _messages) = SessionManager::switch_to("stale-id", &mut sessions);

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, current_id);
    assert_ne!(current_id, "stale-id");
}

#[test]
fn it_titles_on_the_first_user_message() {
    let mut sessions = vec![Session::new()];
    let id = sessions[0].id.to_string();
    assert!(sessions[0].is_new);

    SessionManager::append_message(&id, Message::new(Author::User, "How do I sort a Vec?"), &mut sessions);

    assert_eq!(sessions[0].name, "How do I sort a Vec?");
    assert!(!sessions[0].is_new);

    SessionManager::append_message(&id, Message::new(Author::User, "Another question"), &mut sessions);

    assert_eq!(sessions[0].name, "How do I sort a Vec?");
    assert_eq!(sessions[0].messages.len(), 2);
}

#[test]
fn it_does_not_title_on_assistant_messages() {
    let mut sessions = vec![Session::new()];
    let id = sessions[0].id.to_string();

    SessionManager::append_message(&id, Message::new(Author::Assistant, "Hey there!"), &mut sessions);

    assert_eq!(sessions[0].name, DEFAULT_SESSION_NAME);
    assert!(sessions[0].is_new);
}

#[test]
fn it_bumps_last_activity_on_append() {
    let mut sessions = vec![session_fixture("a", 1)];
    let id = sessions[0].id.to_string();
    let message = Message::new(Author::User, "hello");
    let expected = message.timestamp;

    SessionManager::append_message(&id, message, &mut sessions);

    assert_eq!(sessions[0].timestamp, expected);
}

#[test]
fn it_ignores_appends_to_unknown_sessions() {
    let mut sessions = vec![session_fixture("a", 1)];

    SessionManager::append_message("does-not-exist", Message::new(Author::User, "hello"), &mut sessions);

    assert!(sessions[0].messages.is_empty());
    assert_eq!(sessions.len(), 1);
}

#[test]
fn it_deletes_a_non_current_session() {
    let mut sessions = vec![session_fixture("a", 1), session_fixture("b", 2)];
    let current = sessions[0].id.to_string();
    let other = sessions[1].id.to_string();

    let new_current = SessionManager::delete_session(&other, &mut sessions, &current);

    assert_eq!(new_current, current);
    assert_eq!(sessions.len(), 1);
}

#[test]
fn it_promotes_the_most_recent_session_on_delete() {
    let mut sessions = vec![
        session_fixture("a", 10),
        session_fixture("b", 30),
        session_fixture("c", 20),
    ];
    let current = sessions[0].id.to_string();
    let most_recent = sessions[1].id.to_string();

    let new_current = SessionManager::delete_session(&current, &mut sessions, &current);

    assert_eq!(new_current, most_recent);
    assert_eq!(sessions.len(), 2);
}

#[test]
fn it_synthesizes_a_session_when_deleting_the_last_one() {
    let mut sessions = vec![session_fixture("a", 1)];
    let current = sessions[0].id.to_string();

    let new_current = SessionManager::delete_session(&current, &mut sessions, &current);

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, new_current);
    assert!(sessions[0].messages.is_empty());
    assert!(sessions[0].is_new);
}

#[test]
fn it_truncates_long_titles() {
    let text = "a".repeat(60);
    let messages = vec![Message::new(Author::User, &text)];

    let title = SessionManager::title_for(&messages);

    assert_eq!(title.chars().count(), 43);
    assert!(title.ends_with("..."));
}

#[test]
fn it_keeps_short_titles_untouched() {
    let messages = vec![
        Message::new(Author::System, "welcome"),
        Message::new(Author::User, "short prompt"),
    ];

    let title = SessionManager::title_for(&messages);

    assert_eq!(title, "short prompt");
}

#[test]
fn it_falls_back_to_the_default_title() {
    let messages = vec![Message::new(Author::Assistant, "Hey there!")];

    assert_eq!(SessionManager::title_for(&messages), DEFAULT_SESSION_NAME);
    assert_eq!(SessionManager::title_for(&[]), DEFAULT_SESSION_NAME);
}
