use uuid::Uuid;

use crate::models::vote::VoteTarget;

pub struct RedisKey;

impl RedisKey {
    pub fn leaderboard(campus_id: Uuid) -> String {
        format!("leaderboard:{campus_id}")
    }

    pub fn vote_lock(target: VoteTarget, target_id: Uuid, user_id: Uuid) -> String {
        format!("vote_lock:{}:{target_id}:{user_id}", target.as_str())
    }

    pub fn plan_lock(campus_id: Uuid, user_id: Uuid) -> String {
        format!("vote_lock:plan:{campus_id}:{user_id}")
    }

    pub fn demo_entity(entity: &str) -> String {
        format!("fratrank_{entity}")
    }
}
