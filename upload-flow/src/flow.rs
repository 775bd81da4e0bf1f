use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{Result, SubmissionError, TransportError},
    service::ServiceReply,
};

/// Core trait describing one upload-analyze-render workflow.
///
/// A flow only knows where to send the upload, which boolean flag rides along
/// with it, how to name its failures and how to render a successful payload.
/// The request lifecycle lives in [`FlowSession`](crate::FlowSession).
pub trait AnalysisFlow: Send + Sync + 'static {
    /// Typed payload of a successful analysis
    type Output: DeserializeOwned + Clone + Send + Sync + 'static;

    /// Unique identifier for this flow, used in logs
    fn id(&self) -> &str;

    /// Path of the analysis endpoint, relative to the service base URL
    fn endpoint(&self) -> &str;

    /// Multipart field carrying the enrichment flag
    fn flag_field(&self) -> &str;

    /// Message used when the service fails without saying why
    fn default_error(&self) -> &str;

    /// Render a successful payload as text panels
    fn render(&self, output: &Self::Output) -> String;
}

/// Turn a raw service reply into the flow's payload or a user-facing failure.
pub fn interpret_reply<F>(flow: &F, reply: &ServiceReply) -> Result<F::Output>
where
    F: AnalysisFlow + ?Sized,
{
    let body: Value = serde_json::from_str(&reply.body).map_err(TransportError::from)?;

    let failed = !reply.is_success() || body.get("error").is_some_and(|error| !error.is_null());
    if failed {
        let message =
            server_error_message(&body).unwrap_or_else(|| flow.default_error().to_string());
        return Err(SubmissionError::Service {
            status: Some(reply.status),
            message,
        });
    }

    Ok(serde_json::from_value(body).map_err(TransportError::from)?)
}

fn server_error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
