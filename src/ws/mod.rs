pub mod chat;
pub mod routes;

pub use routes::create_ws_routes;
