mod dto;
pub mod handlers;
pub mod repo;

pub use handlers::routes;
pub use repo::ProgressRecord;
