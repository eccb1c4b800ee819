pub mod conversion;
pub mod handlers;
pub mod listing;
pub mod media;
pub mod routes;

pub use routes::create_router;
