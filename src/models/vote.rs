use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    pub fn as_i16(self) -> i16 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(VoteValue::Up),
            -1 => Some(VoteValue::Down),
            _ => None,
        }
    }
}

/// Outcome of applying a requested vote on top of the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub previous: Option<VoteValue>,
    pub next: Option<VoteValue>,
    pub upvote_delta: i64,
    pub downvote_delta: i64,
}

impl VoteTransition {
    /// Requesting the stored value clears it, anything else replaces it.
    pub fn apply(current: Option<VoteValue>, requested: VoteValue) -> Self {
        let next = if current == Some(requested) {
            None
        } else {
            Some(requested)
        };

        let count = |state: Option<VoteValue>, side: VoteValue| i64::from(state == Some(side));

        Self {
            previous: current,
            next,
            upvote_delta: count(next, VoteValue::Up) - count(current, VoteValue::Up),
            downvote_delta: count(next, VoteValue::Down) - count(current, VoteValue::Down),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteTally {
    pub fn net(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    pub fn apply(&self, transition: &VoteTransition) -> Self {
        Self {
            upvotes: (self.upvotes + transition.upvote_delta).max(0),
            downvotes: (self.downvotes + transition.downvote_delta).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTarget {
    Comment,
    Photo,
    Chat,
}

impl VoteTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteTarget::Comment => "comment",
            VoteTarget::Photo => "photo",
            VoteTarget::Chat => "chat",
        }
    }

    pub(crate) fn target_table(self) -> &'static str {
        match self {
            VoteTarget::Comment => "party_comments",
            VoteTarget::Photo => "party_photos",
            VoteTarget::Chat => "chat_messages",
        }
    }

    pub(crate) fn vote_table(self) -> &'static str {
        match self {
            VoteTarget::Comment => "comment_votes",
            VoteTarget::Photo => "photo_votes",
            VoteTarget::Chat => "chat_votes",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub target_id: Uuid,
    /// 1, -1 or 0 when the caller has no vote left on the target.
    pub user_vote: i16,
    pub upvotes: i64,
    pub downvotes: i64,
}
