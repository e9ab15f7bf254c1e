//! Object store client for guest photos.
//!
//! Speaks the unsigned-upload API of Cloudinary-style media services: a JSON
//! body carrying the file as a data URI plus an upload preset, answered with
//! the public `secure_url` of the stored object.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use domain::models::MediaRef;
use domain::services::GatewayError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Object store configuration.
#[derive(Debug, Clone)]
pub struct MediaStoreConfig {
    /// Upload endpoint, e.g. `https://api.cloudinary.com/v1_1/<cloud>/image/upload`.
    pub upload_url: String,
    pub upload_preset: String,
    /// Optional folder the objects are stored under.
    pub folder: Option<String>,
    pub timeout_ms: u64,
}

impl MediaStoreConfig {
    pub fn is_configured(&self) -> bool {
        !self.upload_url.trim().is_empty() && !self.upload_preset.trim().is_empty()
    }
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file: String,
    upload_preset: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    #[serde(default)]
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

/// HTTP client for the object store.
#[derive(Clone)]
pub struct MediaStoreClient {
    client: Client,
    config: MediaStoreConfig,
}

impl MediaStoreClient {
    pub fn new(config: MediaStoreConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    /// Upload bytes and return the public URL of the stored object.
    pub async fn upload(&self, bytes: &[u8], content_type: &str) -> Result<MediaRef, GatewayError> {
        let request = UploadRequest {
            file: data_uri(bytes, content_type),
            upload_preset: &self.config.upload_preset,
            folder: self.config.folder.as_deref(),
        };

        let response = self
            .client
            .post(&self.config.upload_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout(Duration::from_millis(self.config.timeout_ms))
                } else {
                    GatewayError::Backend(format!("Object store request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body: UploadResponse = response.json().await.map_err(|e| {
            GatewayError::Backend(format!("Invalid object store response ({}): {}", status, e))
        })?;

        if !status.is_success() {
            let message = body
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            tracing::error!(status = %status, error = %message, "Object store rejected upload");
            return Err(GatewayError::Backend(format!("Object store rejected upload: {}", message)));
        }

        let url = body.secure_url.ok_or_else(|| {
            GatewayError::Backend("Object store response has no secure_url".to_string())
        })?;
        tracing::debug!(media_ref = %url, size = bytes.len(), "Media uploaded");
        Ok(MediaRef(url))
    }
}

fn data_uri(bytes: &[u8], content_type: &str) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri(b"abc", "image/png"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_is_configured() {
        let config = MediaStoreConfig {
            upload_url: "https://api.cloudinary.com/v1_1/demo/image/upload".to_string(),
            upload_preset: String::new(),
            folder: None,
            timeout_ms: 10_000,
        };
        assert!(!config.is_configured());
        assert!(MediaStoreConfig {
            upload_preset: "wedding_unsigned".to_string(),
            ..config
        }
        .is_configured());
    }

    #[test]
    fn test_upload_request_serialization() {
        let request = UploadRequest {
            file: "data:image/png;base64,YWJj".to_string(),
            upload_preset: "wedding_unsigned",
            folder: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["upload_preset"], "wedding_unsigned");
        assert!(json.get("folder").is_none());
    }

    #[test]
    fn test_upload_response_parsing() {
        let ok: UploadResponse =
            serde_json::from_str(
                r#"{"secure_url":"https://res.example.com/a.jpg","public_id":"a"}"#,
            )
                .unwrap();
        assert_eq!(ok.secure_url.as_deref(), Some("https://res.example.com/a.jpg"));

        let err: UploadResponse =
            serde_json::from_str(r#"{"error":{"message":"Upload preset not found"}}"#).unwrap();
        assert_eq!(err.error.unwrap().message, "Upload preset not found");
    }
}
