use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::engine::{EngineError, EngineParams, ExtractionEngine};

/// Engine reachable over HTTP that shares the upload directory with us.
#[derive(Clone)]
pub struct HttpEngine {
    url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct HttpEngineRequest<'a> {
    file_path: &'a Path,
    #[serde(flatten)]
    params: &'a EngineParams,
}

impl HttpEngine {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ExtractionEngine for HttpEngine {
    fn name(&self) -> &str {
        "http"
    }

    async fn extract(&self, file: &Path, params: &EngineParams) -> Result<Value, EngineError> {
        let request = HttpEngineRequest {
            file_path: file,
            params,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.trim();
            return Err(if body.is_empty() {
                EngineError::failed(format!("engine returned {status}"))
            } else {
                EngineError::failed(format!("engine returned {status}: {body}"))
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MzTarget;
    use serde_json::json;

    #[test]
    fn test_request_body_flattens_params() {
        let params = EngineParams {
            target_mz_arr: MzTarget::Single(150.0),
            target_rt: Some(4.2),
            mz_tol: 0.01,
            rt_tol: 0.3,
            rt_range: Some((1.0, 9.0)),
            show_target_rt: false,
            ylim: None,
        };
        let request = HttpEngineRequest {
            file_path: Path::new("/tmp/upload.mzML"),
            params: &params,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["file_path"], json!("/tmp/upload.mzML"));
        assert_eq!(body["target_mz_arr"], json!(150.0));
        assert_eq!(body["rt_range"], json!([1.0, 9.0]));
        assert_eq!(body["show_target_rt"], json!(false));
    }

    fn single_target_params() -> EngineParams {
        EngineParams {
            target_mz_arr: MzTarget::Single(150.0),
            target_rt: None,
            mz_tol: 0.01,
            rt_tol: 0.3,
            rt_range: None,
            show_target_rt: true,
            ylim: None,
        }
    }

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn serve(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_returns_engine_json() {
        use axum::Json;
        use axum::routing::post;

        let router = axum::Router::new().route(
            "/extract",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "echo_path": body["file_path"],
                    "echo_mz": body["target_mz_arr"],
                    "eic": [[1, 2], [10, 20]]
                }))
            }),
        );
        let engine = HttpEngine::new(format!("{}/extract", serve(router).await));

        let value = engine
            .extract(Path::new("/tmp/upload.mzML"), &single_target_params())
            .await
            .unwrap();
        assert_eq!(value["echo_path"], json!("/tmp/upload.mzML"));
        assert_eq!(value["echo_mz"], json!(150.0));
        assert_eq!(value["eic"], json!([[1, 2], [10, 20]]));
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        use axum::http::StatusCode;
        use axum::routing::post;

        let router = axum::Router::new()
            .route(
                "/broken",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "corrupt spectrum\n") }),
            )
            .route("/silent", post(|| async { StatusCode::BAD_GATEWAY }))
            .route("/garbage", post(|| async { "not json" }));
        let base = serve(router).await;

        let err = HttpEngine::new(format!("{base}/broken"))
            .extract(Path::new("/tmp/a.mzML"), &single_target_params())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "engine returned 500 Internal Server Error: corrupt spectrum"
        );

        let err = HttpEngine::new(format!("{base}/silent"))
            .extract(Path::new("/tmp/a.mzML"), &single_target_params())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "engine returned 502 Bad Gateway");

        let err = HttpEngine::new(format!("{base}/garbage"))
            .extract(Path::new("/tmp/a.mzML"), &single_target_params())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_an_error() {
        let engine = HttpEngine::new("http://127.0.0.1:9/extract".to_string());
        let params = single_target_params();

        let err = engine
            .extract(Path::new("/tmp/upload.mzML"), &params)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Http(_)));
    }
}
