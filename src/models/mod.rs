// Data models

pub mod health_submission;
pub mod risk;
pub mod user;

pub use health_submission::*;
pub use risk::*;
pub use user::*;
