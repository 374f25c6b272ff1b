pub mod lock;
pub mod patch;
