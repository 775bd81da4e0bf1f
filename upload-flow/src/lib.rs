pub mod error;
pub mod flow;
pub mod selection;
pub mod service;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use error::{Result, SubmissionError, TransportError};
pub use flow::{AnalysisFlow, interpret_reply};
pub use selection::{ACCEPTED_EXTENSIONS, UploadKind, UploadSelection};
pub use service::{AnalysisRequest, AnalysisService, HttpAnalysisService, ServiceReply};
pub use session::{FlowSession, NO_FILE_SELECTED};
pub use state::RequestState;
