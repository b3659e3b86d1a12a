pub mod session;
pub mod types;

pub use session::{VerificationSession, VerificationStep};
pub use types::{DocumentType, FaceComparisonResult, ImageBlob, OcrResult};
