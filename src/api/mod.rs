pub mod dashboard;
pub mod http;
pub mod types;
pub mod verification;

pub use dashboard::DashboardClient;
pub use http::ApiTransport;
pub use verification::{HttpVerificationApi, VerificationApi};
