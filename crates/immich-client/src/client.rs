//! HTTP client for the Immich admin API.
//!
//! One `ImmichClient` wraps a pooled `reqwest::Client` plus the read-only
//! base address and credential. It is `Clone + Send + Sync` and is safe to
//! share across concurrent fetches.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::types::{JobsResponse, LibraryStatistics, StorageStatus};

/// Per-request timeout applied to every upstream call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const API_KEY_HEADER: &str = "x-api-key";

const JOBS_PATH: &str = "/api/jobs";
const STATISTICS_PATH: &str = "/api/server/statistics";
const STORAGE_PATH: &str = "/api/server/storage";

/// Authenticated client for the three admin resources the exporter polls.
#[derive(Debug, Clone)]
pub struct ImmichClient {
    /// Base address with trailing `/` stripped.
    base_url: String,
    /// `x-api-key` value, marked sensitive so it never shows up in `Debug`.
    api_key: HeaderValue,
    http: reqwest::Client,
}

impl ImmichClient {
    /// Create a client with the default 10 second request timeout.
    pub fn new(base_url: &str, api_key: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, api_key: &str, timeout: Duration) -> ClientResult<Self> {
        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| ClientError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("immich-exporter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            base_url: normalize_base_url(base_url),
            api_key,
            http,
        })
    }

    /// The normalized base address.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a resource path (which must start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET /api/jobs
    pub async fn fetch_jobs(&self) -> ClientResult<JobsResponse> {
        self.get_json(JOBS_PATH).await
    }

    /// GET /api/server/statistics
    pub async fn fetch_statistics(&self) -> ClientResult<LibraryStatistics> {
        self.get_json(STATISTICS_PATH).await
    }

    /// GET /api/server/storage
    pub async fn fetch_storage(&self) -> ClientResult<StorageStatus> {
        self.get_json(STORAGE_PATH).await
    }

    /// Liveness check: succeeds iff a jobs fetch succeeds.
    pub async fn ping(&self) -> ClientResult<()> {
        self.fetch_jobs().await.map(|_| ())
    }

    async fn get_json<T: DeserializeOwned + Default>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);

        let resp = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            debug!(%url, %status, "upstream returned non-OK status");
            return Err(ClientError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        // Body read failures (including timeouts mid-body) are transport errors.
        let body = resp.bytes().await.map_err(|source| ClientError::Transport {
            url: url.clone(),
            source,
        })?;

        // A literal `null` body carries no data and decodes as empty.
        serde_json::from_slice::<Option<T>>(&body)
            .map(Option::unwrap_or_default)
            .map_err(|source| ClientError::Decode { url, source })
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    use axum::Json;
    use axum::Router;
    use axum::http::HeaderMap;
    use axum::response::IntoResponse;
    use axum::routing::get;

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn sample_jobs() -> JobsResponse {
        let mut jobs = JobsResponse::new();
        jobs.insert(
            "thumbnailGeneration".to_string(),
            JobQueueStatus {
                job_counts: JobCounts {
                    active: 3,
                    waiting: 10,
                    failed: 2,
                    ..Default::default()
                },
                queue_status: QueueStatus {
                    is_active: true,
                    is_paused: false,
                },
            },
        );
        jobs.insert(
            "faceDetection".to_string(),
            JobQueueStatus {
                job_counts: JobCounts {
                    active: 1,
                    waiting: 100,
                    delayed: 5,
                    ..Default::default()
                },
                queue_status: QueueStatus {
                    is_active: true,
                    is_paused: false,
                },
            },
        );
        jobs
    }

    /// Jobs handler that insists on the credential and accept headers.
    async fn authed_jobs(headers: HeaderMap) -> axum::response::Response {
        let key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
        let accept = headers.get("accept").and_then(|v| v.to_str().ok());
        if key != Some("test-key") {
            return axum::http::StatusCode::UNAUTHORIZED.into_response();
        }
        if accept != Some("application/json") {
            return axum::http::StatusCode::NOT_ACCEPTABLE.into_response();
        }
        Json(sample_jobs()).into_response()
    }

    #[test]
    fn normalizes_trailing_slash() {
        let client = ImmichClient::new("http://localhost:2283/", "test-key").unwrap();
        assert_eq!(client.base_url(), "http://localhost:2283");
    }

    #[test]
    fn normalizes_repeated_trailing_slashes() {
        for input in [
            "http://localhost:2283",
            "http://localhost:2283/",
            "http://localhost:2283///",
        ] {
            let client = ImmichClient::new(input, "test-key").unwrap();
            assert_eq!(client.base_url(), "http://localhost:2283");
            assert_eq!(client.url("/api/jobs"), "http://localhost:2283/api/jobs");
        }
    }

    #[test]
    fn keeps_path_prefix() {
        let client = ImmichClient::new("https://photos.example.com/immich/", "k").unwrap();
        assert_eq!(
            client.url("/api/server/storage"),
            "https://photos.example.com/immich/api/server/storage"
        );
    }

    #[test]
    fn rejects_api_key_with_control_characters() {
        let err = ImmichClient::new("http://localhost", "bad\nkey").unwrap_err();
        assert!(matches!(err, ClientError::InvalidApiKey));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = ImmichClient::new("http://localhost", "super-secret").unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }

    #[tokio::test]
    async fn fetch_jobs_sends_credentials() {
        let base = serve(Router::new().route("/api/jobs", get(authed_jobs))).await;

        let client = ImmichClient::new(&base, "test-key").unwrap();
        let jobs = client.fetch_jobs().await.unwrap();

        assert_eq!(jobs["thumbnailGeneration"].job_counts.active, 3);
        assert_eq!(jobs["faceDetection"].job_counts.waiting, 100);
    }

    #[tokio::test]
    async fn fetch_jobs_with_trailing_slash_base() {
        let base = serve(Router::new().route("/api/jobs", get(authed_jobs))).await;

        let client = ImmichClient::new(&format!("{base}//"), "test-key").unwrap();
        assert!(client.fetch_jobs().await.is_ok());
    }

    #[tokio::test]
    async fn fetch_statistics() {
        let router = Router::new().route(
            "/api/server/statistics",
            get(|| async {
                Json(LibraryStatistics {
                    photos: 5000,
                    videos: 1000,
                    usage: 100_000_000_000,
                    usage_by_user: vec![
                        UserUsage {
                            user_name: "alice".to_string(),
                            photos: 3000,
                            videos: 600,
                            usage: 60_000_000_000,
                        },
                        UserUsage {
                            user_name: "bob".to_string(),
                            photos: 2000,
                            videos: 400,
                            usage: 40_000_000_000,
                        },
                    ],
                })
            }),
        );
        let base = serve(router).await;

        let client = ImmichClient::new(&base, "test-key").unwrap();
        let stats = client.fetch_statistics().await.unwrap();

        assert_eq!(stats.photos, 5000);
        assert_eq!(stats.usage_by_user.len(), 2);
        assert_eq!(stats.usage_by_user[0].user_name, "alice");
    }

    #[tokio::test]
    async fn fetch_storage() {
        let router = Router::new().route(
            "/api/server/storage",
            get(|| async {
                Json(StorageStatus {
                    total_bytes: 1_000_000_000_000,
                    used_bytes: 500_000_000_000,
                    available_bytes: 500_000_000_000,
                    usage_percentage: 50.0,
                })
            }),
        );
        let base = serve(router).await;

        let client = ImmichClient::new(&base, "test-key").unwrap();
        let storage = client.fetch_storage().await.unwrap();

        assert_eq!(storage.total_bytes, 1_000_000_000_000);
        assert_eq!(storage.usage_percentage, 50.0);
    }

    #[tokio::test]
    async fn non_ok_status_is_http_status_error() {
        let base = serve(Router::new().route("/api/jobs", get(authed_jobs))).await;

        let client = ImmichClient::new(&base, "bad-key").unwrap();
        let err = client.fetch_jobs().await.unwrap_err();

        match err {
            ClientError::HttpStatus { status, url } => {
                assert_eq!(status, 401);
                assert!(url.ends_with("/api/jobs"));
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_200_success_status_is_rejected() {
        let router = Router::new().route(
            "/api/jobs",
            get(|| async { axum::http::StatusCode::NO_CONTENT }),
        );
        let base = serve(router).await;

        let client = ImmichClient::new(&base, "test-key").unwrap();
        let err = client.fetch_jobs().await.unwrap_err();
        assert_eq!(err.kind(), "http_status");
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let router = Router::new().route("/api/server/storage", get(|| async { "not json" }));
        let base = serve(router).await;

        let client = ImmichClient::new(&base, "test-key").unwrap();
        let err = client.fetch_storage().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn null_body_decodes_as_empty() {
        let router = Router::new()
            .route("/api/jobs", get(|| async { "null" }))
            .route("/api/server/storage", get(|| async { "null" }));
        let base = serve(router).await;

        let client = ImmichClient::new(&base, "test-key").unwrap();
        let jobs = client.fetch_jobs().await.unwrap();
        assert!(jobs.is_empty());
        let storage = client.fetch_storage().await.unwrap();
        assert_eq!(storage, StorageStatus::default());
    }

    #[tokio::test]
    async fn wrong_shape_is_decode_error() {
        let router = Router::new().route("/api/jobs", get(|| async { Json(vec![1, 2, 3]) }));
        let base = serve(router).await;

        let client = ImmichClient::new(&base, "test-key").unwrap();
        let err = client.fetch_jobs().await.unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let router = Router::new().route(
            "/api/jobs",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(JobsResponse::new())
            }),
        );
        let base = serve(router).await;

        let client =
            ImmichClient::with_timeout(&base, "test-key", Duration::from_millis(100)).unwrap();
        let started = std::time::Instant::now();
        let err = client.fetch_jobs().await.unwrap_err();

        assert!(matches!(err, ClientError::Transport { .. }), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn ping_succeeds_when_jobs_succeed() {
        let router = Router::new().route("/api/jobs", get(|| async { Json(JobsResponse::new()) }));
        let base = serve(router).await;

        let client = ImmichClient::new(&base, "test-key").unwrap();
        assert!(client.ping().await.is_ok());
    }

    #[tokio::test]
    async fn ping_fails_when_jobs_fail() {
        let base = serve(Router::new().route("/api/jobs", get(authed_jobs))).await;

        let client = ImmichClient::new(&base, "wrong-key").unwrap();
        assert!(client.ping().await.is_err());
    }

    #[tokio::test]
    async fn ping_fails_for_unreachable_server() {
        // Grab a free port, then release it so nothing is listening there.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let client = ImmichClient::new(&format!("http://{addr}"), "test-key").unwrap();
        let err = client.ping().await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
