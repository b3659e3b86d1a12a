pub mod verification;

pub use verification::{SubmissionOutcome, VerificationFlowController};
