use chrono::Utc;
use fratrank_be::{
    models::chat::{ChatMessage, ChatServerMessage},
    state::ChatFeeds,
    ws::chat::is_replay,
};
use std::collections::HashSet;
use uuid::Uuid;

fn message(campus_id: Uuid) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4(),
        campus_id,
        user_id: Uuid::new_v4(),
        body: "who's hosting tonight".to_string(),
        party_id: None,
        fraternity_id: None,
        upvotes: 0,
        downvotes: 0,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_subscriber_sees_messages_posted_after_subscribing() {
    let feeds = ChatFeeds::default();
    let campus = Uuid::new_v4();

    // Posted before anyone listens: nothing to deliver to
    let early = message(campus);
    assert_eq!(
        feeds
            .publish(campus, ChatServerMessage::Chat { message: early })
            .await,
        0
    );

    let mut feed = feeds.subscribe(campus).await;

    // Posted while the history query would be running
    let during = message(campus);
    let delivered = feeds
        .publish(campus, ChatServerMessage::Chat { message: during.clone() })
        .await;
    assert_eq!(delivered, 1);

    match feed.recv().await.unwrap() {
        ChatServerMessage::Chat { message } => assert_eq!(message.id, during.id),
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_feeds_are_per_campus() {
    let feeds = ChatFeeds::default();
    let campus = Uuid::new_v4();
    let other_campus = Uuid::new_v4();

    let mut feed = feeds.subscribe(campus).await;
    let _other = feeds.subscribe(other_campus).await;

    feeds
        .publish(other_campus, ChatServerMessage::Chat { message: message(other_campus) })
        .await;
    assert!(feed.try_recv().is_err());
}

#[test]
fn test_history_messages_are_not_replayed() {
    let campus = Uuid::new_v4();
    let in_history = message(campus);
    let fresh = message(campus);
    let delivered: HashSet<Uuid> = [in_history.id].into_iter().collect();

    assert!(is_replay(
        &ChatServerMessage::Chat { message: in_history.clone() },
        &delivered
    ));
    assert!(!is_replay(
        &ChatServerMessage::Chat { message: fresh },
        &delivered
    ));

    // Vote updates on history messages still go out
    let vote = ChatServerMessage::VoteUpdate {
        message_id: in_history.id,
        upvotes: 1,
        downvotes: 0,
    };
    assert!(!is_replay(&vote, &delivered));
}
