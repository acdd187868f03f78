pub mod extractor;
pub mod handlers;
pub mod library;
pub mod prompts;
pub mod skj;
