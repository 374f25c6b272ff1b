pub mod cache;
pub mod get;
