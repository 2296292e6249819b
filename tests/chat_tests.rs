//! Chat session against an in-memory backend.

mod common;

use common::{MockApi, tp53_api};
use protein_explorer::api::ChatReply;
use protein_explorer::chat::{ChatSession, NO_REPLY};
use protein_explorer::config::defaults;

fn session() -> ChatSession {
    ChatSession::new(&defaults::identity_questions(), defaults::identity_response())
}

#[test]
fn reply_is_recorded_with_the_question() {
    let api = tp53_api();
    let mut chat = session();

    let reply = chat.send(&api, "  What does it do? ", Some("TP53"));
    assert_eq!(reply.as_deref(), Some("TP53 guards the genome."));
    assert_eq!(
        chat.history(),
        &["What does it do?".to_string(), "TP53 guards the genome.".to_string()]
    );

    let sent = api.conversations.lock().clone();
    assert_eq!(
        sent,
        vec![(vec!["What does it do?".to_string()], Some("TP53".to_string()))]
    );
}

#[test]
fn whole_history_is_sent_each_time() {
    let api = tp53_api();
    let mut chat = session();
    chat.send(&api, "first", None);
    chat.send(&api, "second", None);

    let sent = api.conversations.lock().clone();
    assert_eq!(sent[1].0.len(), 3);
    assert_eq!(sent[1].0[2], "second");
}

#[test]
fn identity_questions_are_answered_locally() {
    let api = tp53_api();
    let mut chat = session();

    let reply = chat.send(&api, "Hey, who made you?", Some("TP53"));
    assert_eq!(reply, Some(defaults::identity_response()));
    assert!(chat.history().is_empty());
    assert!(api.conversations.lock().is_empty());
}

#[test]
fn blank_message_is_ignored() {
    let api = tp53_api();
    let mut chat = session();
    assert_eq!(chat.send(&api, "   ", None), None);
    assert!(api.conversations.lock().is_empty());
}

#[test]
fn empty_reply_gets_apology_and_is_not_recorded() {
    let api = MockApi {
        chat_reply: Some(ChatReply { response: None }),
        ..tp53_api()
    };
    let mut chat = session();

    assert_eq!(chat.send(&api, "hello", None).as_deref(), Some(NO_REPLY));
    assert_eq!(chat.history(), &["hello".to_string()]);
}

#[test]
fn transport_error_is_shown_as_error() {
    let api = MockApi {
        chat_reply: None,
        ..tp53_api()
    };
    let mut chat = session();

    assert_eq!(
        chat.send(&api, "hello", None).as_deref(),
        Some("Error: conversation unavailable")
    );
    assert_eq!(chat.history(), &["hello".to_string()]);
}
