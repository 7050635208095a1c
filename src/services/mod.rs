// Business logic services

pub mod archive_service;
pub mod chart_service;
pub mod risk_model_service;
pub mod submission_service;
pub mod user_service;

pub use archive_service::ArchiveService;
pub use chart_service::ChartService;
pub use risk_model_service::RiskModelService;
pub use submission_service::SubmissionService;
pub use user_service::{RegisterOutcome, UserService};
