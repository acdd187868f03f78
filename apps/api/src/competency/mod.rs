pub mod handlers;
pub mod mapper;
pub mod mapping;
pub mod prompts;
pub mod seed;
