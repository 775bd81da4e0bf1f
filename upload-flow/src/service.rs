use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use tracing::{debug, info};

use crate::{error::TransportError, selection::UploadSelection};

/// One multipart submission: the file plus a single boolean flag.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub endpoint: &'a str,
    pub upload: &'a UploadSelection,
    pub flag_field: &'a str,
    pub flag: bool,
}

impl AnalysisRequest<'_> {
    /// Flag value as the form field text.
    pub fn flag_value(&self) -> &'static str {
        if self.flag { "true" } else { "false" }
    }
}

/// Raw answer from the analysis service, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: String,
}

impl ServiceReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The external collaborator that performs the actual analysis.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn submit(&self, request: AnalysisRequest<'_>) -> Result<ServiceReply, TransportError>;
}

/// [`AnalysisService`] reached over HTTP with a multipart POST.
#[derive(Clone)]
pub struct HttpAnalysisService {
    client: Client,
    base_url: String,
}

impl HttpAnalysisService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

fn build_form(request: &AnalysisRequest<'_>) -> Result<Form, TransportError> {
    let file_part = Part::bytes(request.upload.bytes().to_vec())
        .file_name(request.upload.file_name().to_string())
        .mime_str(request.upload.mime_type())?;

    Ok(Form::new()
        .part("file", file_part)
        .text(request.flag_field.to_string(), request.flag_value()))
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn submit(&self, request: AnalysisRequest<'_>) -> Result<ServiceReply, TransportError> {
        let url = self.url_for(request.endpoint);
        info!(
            "Posting {} ({} bytes) to {}",
            request.upload.file_name(),
            request.upload.len(),
            url
        );

        let form = build_form(&request)?;
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("Analysis service answered {} with {} bytes", status, body.len());

        Ok(ServiceReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Multipart,
        http::StatusCode,
        routing::post,
    };
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    async fn echo_upload(mut multipart: Multipart) -> (StatusCode, Json<Value>) {
        let mut fields = serde_json::Map::new();
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or("").to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field.bytes().await.unwrap_or_default();
                fields.insert(
                    "file".to_string(),
                    json!({
                        "name": file_name,
                        "contentType": content_type,
                        "size": bytes.len()
                    }),
                );
            } else {
                let text = field.text().await.unwrap_or_default();
                fields.insert(name, json!(text));
            }
        }
        (StatusCode::OK, Json(Value::Object(fields)))
    }

    async fn reject() -> (StatusCode, Json<Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Unsupported file" })),
        )
    }

    async fn spawn_server() -> anyhow::Result<String> {
        let app = Router::new()
            .route("/api/echo", post(echo_upload))
            .route("/api/reject", post(reject));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(format!("http://{}/", addr))
    }

    #[tokio::test]
    async fn test_multipart_carries_file_and_flag() -> anyhow::Result<()> {
        let base_url = spawn_server().await?;
        let service = HttpAnalysisService::new(base_url, Duration::from_secs(5))?;
        let upload = UploadSelection::from_bytes("report.pdf", b"%PDF-1.4".to_vec());

        let reply = service
            .submit(AnalysisRequest {
                endpoint: "/api/echo",
                upload: &upload,
                flag_field: "getRecommendations",
                flag: true,
            })
            .await?;

        assert!(reply.is_success());
        let body: Value = serde_json::from_str(&reply.body)?;
        assert_eq!(body["getRecommendations"], "true");
        assert_eq!(body["file"]["name"], "report.pdf");
        assert_eq!(body["file"]["contentType"], "application/pdf");
        assert_eq!(body["file"]["size"], 8);
        Ok(())
    }

    #[tokio::test]
    async fn test_false_flag_is_sent_as_text() -> anyhow::Result<()> {
        let base_url = spawn_server().await?;
        let service = HttpAnalysisService::new(base_url, Duration::from_secs(5))?;
        let upload = UploadSelection::from_bytes("rx.png", vec![0u8; 3]);

        let reply = service
            .submit(AnalysisRequest {
                endpoint: "api/echo",
                upload: &upload,
                flag_field: "getMedicineUses",
                flag: false,
            })
            .await?;

        let body: Value = serde_json::from_str(&reply.body)?;
        assert_eq!(body["getMedicineUses"], "false");
        assert_eq!(body["file"]["contentType"], "image/png");
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() -> anyhow::Result<()> {
        let base_url = spawn_server().await?;
        let service = HttpAnalysisService::new(base_url, Duration::from_secs(5))?;
        let upload = UploadSelection::from_bytes("report.pdf", b"x".to_vec());

        let reply = service
            .submit(AnalysisRequest {
                endpoint: "/api/reject",
                upload: &upload,
                flag_field: "getRecommendations",
                flag: false,
            })
            .await?;

        assert_eq!(reply.status, 400);
        assert!(!reply.is_success());
        assert!(reply.body.contains("Unsupported file"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let service =
            HttpAnalysisService::new(format!("http://{}", addr), Duration::from_secs(2))?;
        let upload = UploadSelection::from_bytes("report.pdf", b"x".to_vec());
        let result = service
            .submit(AnalysisRequest {
                endpoint: "/api/echo",
                upload: &upload,
                flag_field: "getRecommendations",
                flag: false,
            })
            .await;

        assert!(matches!(result, Err(TransportError::Http(_))));
        Ok(())
    }

    #[test]
    fn test_url_joining_ignores_extra_slashes() {
        let service = HttpAnalysisService::with_client(Client::new(), "http://localhost:3000/");
        assert_eq!(service.base_url(), "http://localhost:3000");
        assert_eq!(
            service.url_for("/api/analyze-report"),
            "http://localhost:3000/api/analyze-report"
        );
    }
}
