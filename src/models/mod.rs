pub mod campus;
pub mod chat;
pub mod comment;
pub mod fraternity;
pub mod leaderboard;
pub mod party;
pub mod photo;
pub mod plan;
pub mod rating;
pub mod redis;
pub mod user;
pub mod vote;

pub use user::Claims;
