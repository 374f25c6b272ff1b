use fratrank_be::models::vote::{VoteTally, VoteTransition, VoteValue};

#[test]
fn test_first_vote_counts() {
    let up = VoteTransition::apply(None, VoteValue::Up);
    assert_eq!(up.next, Some(VoteValue::Up));
    assert_eq!((up.upvote_delta, up.downvote_delta), (1, 0));

    let down = VoteTransition::apply(None, VoteValue::Down);
    assert_eq!(down.next, Some(VoteValue::Down));
    assert_eq!((down.upvote_delta, down.downvote_delta), (0, 1));
}

#[test]
fn test_repeating_a_vote_clears_it() {
    let t = VoteTransition::apply(Some(VoteValue::Up), VoteValue::Up);
    assert_eq!(t.next, None);
    assert_eq!((t.upvote_delta, t.downvote_delta), (-1, 0));

    let t = VoteTransition::apply(Some(VoteValue::Down), VoteValue::Down);
    assert_eq!(t.next, None);
    assert_eq!((t.upvote_delta, t.downvote_delta), (0, -1));
}

#[test]
fn test_switching_sides_moves_the_vote() {
    let t = VoteTransition::apply(Some(VoteValue::Up), VoteValue::Down);
    assert_eq!(t.previous, Some(VoteValue::Up));
    assert_eq!(t.next, Some(VoteValue::Down));
    assert_eq!((t.upvote_delta, t.downvote_delta), (-1, 1));
}

#[test]
fn test_toggle_off_then_on_restores_count() {
    let before = VoteTally {
        upvotes: 3,
        downvotes: 1,
    };

    let first = VoteTransition::apply(None, VoteValue::Up);
    let voted = before.apply(&first);
    assert_eq!(voted.upvotes, 4);

    let second = VoteTransition::apply(first.next, VoteValue::Up);
    let cleared = voted.apply(&second);
    assert_eq!(cleared, before);

    let third = VoteTransition::apply(second.next, VoteValue::Up);
    assert_eq!(cleared.apply(&third), voted);
    assert_eq!(voted.net(), 3);
}

#[test]
fn test_vote_value_wire_format() {
    assert_eq!(VoteValue::from_i16(1), Some(VoteValue::Up));
    assert_eq!(VoteValue::from_i16(-1), Some(VoteValue::Down));
    assert_eq!(VoteValue::from_i16(0), None);
    assert_eq!(VoteValue::from_i16(2), None);
    assert_eq!(VoteValue::Down.as_i16(), -1);
}
