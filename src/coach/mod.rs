pub mod dto;
pub mod handlers;
pub mod prompts;

pub use handlers::routes;
