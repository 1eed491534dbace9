//! HTTP implementation of the analysis service client

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;

use super::{AnalysisService, ClientError};
use crate::analysis::UploadResponse;
use crate::config::ServerConfig;

/// REST client for the analysis service
pub struct ApiClient {
    client: Client,
    config: ServerConfig,
}

/// Error body the service sends with 4xx responses
#[derive(Debug, Deserialize)]
struct ServiceError {
    error: String,
}

impl ApiClient {
    pub fn new(config: ServerConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    async fn error_from(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ServiceError>(&text)
            .map(|e| e.error)
            .unwrap_or(text);

        ClientError::Api { status, message }
    }
}

#[async_trait]
impl AnalysisService for ApiClient {
    async fn upload(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadResponse, ClientError> {
        let url = self.config.upload_url();

        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.bytes().await.map_err(ClientError::from_transport)?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    fn report_url(&self) -> String {
        self.config.report_url()
    }

    async fn download_report(&self) -> Result<Vec<u8>, ClientError> {
        let response = self
            .client
            .get(self.config.report_url())
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.bytes().await.map_err(ClientError::from_transport)?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Multipart,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    async fn spawn_service(router: Router) -> ServerConfig {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        ServerConfig {
            base_url: format!("http://{}/api/", addr),
            request_timeout_secs: Some(5),
        }
    }

    /// Echoes the multipart field name and file name back through `history`
    async fn echo_upload(mut multipart: Multipart) -> Json<serde_json::Value> {
        let mut fields = Vec::new();
        let mut bytes = 0;

        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().unwrap_or_default().to_string();
            bytes += field.bytes().await.unwrap().len();
            fields.push(json!({ "field": name, "file_name": file_name }));
        }

        Json(json!({
            "current_analysis": {
                "total_count": bytes,
                "averages": {"Health": 76.333},
                "distribution": {"Pump": 5, "Valve": 7},
                "full_data": []
            },
            "history": fields
        }))
    }

    #[tokio::test]
    async fn test_upload_sends_file_field() {
        let router = Router::new().route("/api/upload/", post(echo_upload));
        let client = ApiClient::new(spawn_service(router).await).unwrap();

        let csv = b"Equipment Name,Type\nPump A,Pump\n".to_vec();
        let len = csv.len() as u64;
        let response = client.upload("plant.csv", csv).await.unwrap();

        assert_eq!(response.current_analysis.total_count, len);
        assert_eq!(response.history.len(), 1);
        assert_eq!(response.history[0]["field"], "file");
        assert_eq!(response.history[0]["file_name"], "plant.csv");
    }

    #[tokio::test]
    async fn test_upload_server_error() {
        let router = Router::new().route(
            "/api/upload/",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid CSV" })),
                )
            }),
        );
        let client = ApiClient::new(spawn_service(router).await).unwrap();

        let err = client.upload("bad.csv", b"x".to_vec()).await.unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid CSV");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_upload_malformed_body() {
        let router = Router::new().route(
            "/api/upload/",
            post(|| async { Json(json!({ "status": "ok" })) }),
        );
        let client = ApiClient::new(spawn_service(router).await).unwrap();

        let err = client.upload("plant.csv", b"x".to_vec()).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_upload_unreachable_service() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(ServerConfig {
            base_url: format!("http://{}/api", addr),
            request_timeout_secs: Some(5),
        })
        .unwrap();

        let err = client.upload("plant.csv", b"x".to_vec()).await.unwrap_err();
        assert!(matches!(err, ClientError::Unavailable));
    }

    #[tokio::test]
    async fn test_download_report() {
        let router = Router::new().route("/api/report/", get(|| async { "%PDF-1.4 report" }));
        let config = spawn_service(router).await;
        let client = ApiClient::new(config.clone()).unwrap();

        assert_eq!(client.report_url(), config.report_url());
        let bytes = client.download_report().await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4 report");
    }

    #[tokio::test]
    async fn test_download_report_without_data() {
        let router = Router::new().route(
            "/api/report/",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "error": "No data" }))) }),
        );
        let client = ApiClient::new(spawn_service(router).await).unwrap();

        let err = client.download_report().await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 404, .. }));
    }
}
