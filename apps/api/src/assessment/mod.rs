pub mod handlers;
pub mod prompts;
pub mod question;
pub mod question_set;
pub mod report;
pub mod scorer;
pub mod session;
