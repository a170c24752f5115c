pub mod dto;
mod extractors;
pub mod handlers;
mod middleware;
mod openapi;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
