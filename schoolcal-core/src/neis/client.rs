//! HTTP client for the NEIS `SchoolSchedule` endpoint.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};
use url::Url;

use crate::config::SchoolCalConfig;
use crate::constants::{PAGE_SIZE, SCHOOL_SCHEDULE_PATH};
use crate::error::{SchoolCalError, SchoolCalResult};
use crate::neis::response::decode_schedule;
use crate::neis::window::ScheduleWindow;
use crate::schedule::ScheduleResponse;

/// Anything that can produce the schedule of one school.
pub trait ScheduleSource: Send + Sync {
    fn fetch(
        &self,
        office_code: &str,
        school_code: &str,
    ) -> impl Future<Output = SchoolCalResult<ScheduleResponse>> + Send;
}

/// Outcome of a single request attempt.
enum Attempt {
    Retry(SchoolCalError),
    Fail(SchoolCalError),
}

pub struct NeisClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    request_timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl NeisClient {
    pub fn new(config: &SchoolCalConfig) -> SchoolCalResult<Self> {
        let api_key = config.require_api_key()?.to_string();

        let endpoint = Url::parse(&config.api_base_url)
            .and_then(|base| base.join(SCHOOL_SCHEDULE_PATH))
            .map_err(|e| {
                SchoolCalError::Config(format!(
                    "Invalid api_base_url '{}': {e}",
                    config.api_base_url
                ))
            })?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.request_timeout())
            .build()
            .map_err(|e| SchoolCalError::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(NeisClient {
            http,
            endpoint,
            api_key,
            request_timeout: config.request_timeout(),
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay(),
        })
    }

    /// Fetch this year's schedule for a school, retrying transient failures
    /// with exponential backoff.
    pub async fn fetch_schedule(
        &self,
        office_code: &str,
        school_code: &str,
    ) -> SchoolCalResult<ScheduleResponse> {
        let window = ScheduleWindow::current();
        let mut attempt = 0;

        loop {
            match self.request(&window, office_code, school_code).await {
                Ok(body) => return decode_schedule(&body),
                Err(Attempt::Retry(err)) if attempt < self.max_retries => {
                    let delay = self
                        .retry_base_delay
                        .saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(
                        office = office_code,
                        school = school_code,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "NEIS request failed, retrying"
                    );
                    sleep(delay).await;
                }
                Err(Attempt::Retry(err)) | Err(Attempt::Fail(err)) => return Err(err),
            }
        }
    }

    async fn request(
        &self,
        window: &ScheduleWindow,
        office_code: &str,
        school_code: &str,
    ) -> Result<String, Attempt> {
        debug!(
            endpoint = %self.endpoint,
            office = office_code,
            school = school_code,
            from = %window.from,
            to = %window.to,
            "requesting NEIS schedule"
        );

        let page_size = PAGE_SIZE.to_string();
        let from = window.from_param();
        let to = window.to_param();
        let query = [
            ("KEY", self.api_key.as_str()),
            ("Type", "json"),
            ("ATPT_OFCDC_SC_CODE", office_code),
            ("SD_SCHUL_CODE", school_code),
            ("MLSV_FROM_YMD", from.as_str()),
            ("MLSV_TO_YMD", to.as_str()),
            ("pSize", page_size.as_str()),
        ];

        let send = async {
            let response = self
                .http
                .get(self.endpoint.clone())
                .query(&query)
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match timeout(self.request_timeout, send).await {
            Err(_) => {
                return Err(Attempt::Retry(SchoolCalError::Transport(format!(
                    "timed out after {}s",
                    self.request_timeout.as_secs()
                ))));
            }
            // Strip the URL so the API key never ends up in logs.
            Ok(Err(e)) => {
                return Err(Attempt::Retry(SchoolCalError::Transport(
                    e.without_url().to_string(),
                )));
            }
            Ok(Ok(reply)) => reply,
        };

        if status.is_success() {
            return Ok(body);
        }

        let err = SchoolCalError::Upstream(format!("HTTP {status}"));
        if status.is_server_error() {
            Err(Attempt::Retry(err))
        } else {
            Err(Attempt::Fail(err))
        }
    }
}

impl ScheduleSource for NeisClient {
    fn fetch(
        &self,
        office_code: &str,
        school_code: &str,
    ) -> impl Future<Output = SchoolCalResult<ScheduleResponse>> + Send {
        self.fetch_schedule(office_code, school_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> SchoolCalConfig {
        let mut config = SchoolCalConfig::with_key("test-key");
        config.api_base_url = server.uri();
        config.retry_base_delay_ms = 1;
        config.max_retries = 2;
        config.request_timeout_secs = 5;
        config
    }

    fn schedule_body() -> serde_json::Value {
        json!({
            "SchoolSchedule": [
                {"head": [{"list_total_count": 1}]},
                {"row": [{
                    "SCHUL_NM": "서울소프트웨어마이스터고",
                    "AA_YMD": "20241225",
                    "EVENT_NM": "크리스마스",
                    "EVENT_CNTNT": "공휴일"
                }]}
            ]
        })
    }

    #[tokio::test]
    async fn test_fetch_sends_neis_query() {
        let server = MockServer::start().await;
        let window = ScheduleWindow::current();

        Mock::given(method("GET"))
            .and(path(SCHOOL_SCHEDULE_PATH))
            .and(query_param("KEY", "test-key"))
            .and(query_param("Type", "json"))
            .and(query_param("ATPT_OFCDC_SC_CODE", "B10"))
            .and(query_param("SD_SCHUL_CODE", "7010569"))
            .and(query_param("MLSV_FROM_YMD", window.from_param().as_str()))
            .and(query_param("MLSV_TO_YMD", window.to_param().as_str()))
            .and(query_param("pSize", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(schedule_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = NeisClient::new(&test_config(&server)).unwrap();
        let response = client.fetch("B10", "7010569").await.unwrap();

        assert_eq!(response.school_name.as_deref(), Some("서울소프트웨어마이스터고"));
        assert_eq!(response.records.len(), 1);
        assert_eq!(response.records[0].event_name, "크리스마스");
    }

    #[tokio::test]
    async fn test_fetch_no_data_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "RESULT": {"CODE": "INFO-200", "MESSAGE": "해당하는 데이터가 없습니다."}
            })))
            .mount(&server)
            .await;

        let client = NeisClient::new(&test_config(&server)).unwrap();
        let response = client.fetch("B10", "7010569").await.unwrap();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(schedule_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = NeisClient::new(&test_config(&server)).unwrap();
        let response = client.fetch("B10", "7010569").await.unwrap();
        assert_eq!(response.records.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = NeisClient::new(&test_config(&server)).unwrap();
        let err = client.fetch("B10", "7010569").await.unwrap_err();
        match err {
            SchoolCalError::Upstream(msg) => assert!(msg.contains("500"), "{msg}"),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = NeisClient::new(&test_config(&server)).unwrap();
        let err = client.fetch("B10", "7010569").await.unwrap_err();
        assert!(matches!(err, SchoolCalError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(schedule_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = test_config(&server);
        config.request_timeout_secs = 1;
        config.max_retries = 0;

        let client = NeisClient::new(&config).unwrap();
        let err = client.fetch("B10", "7010569").await.unwrap_err();
        assert!(matches!(err, SchoolCalError::Transport(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = NeisClient::new(&test_config(&server)).unwrap();
        let err = client.fetch("B10", "7010569").await.unwrap_err();
        assert!(matches!(err, SchoolCalError::MalformedResponse(_)));
    }

    #[test]
    fn test_new_requires_api_key() {
        let config = SchoolCalConfig::with_key("");
        assert!(matches!(
            NeisClient::new(&config),
            Err(SchoolCalError::Config(_))
        ));
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        let mut config = SchoolCalConfig::with_key("test-key");
        config.api_base_url = "not a url".into();
        assert!(matches!(
            NeisClient::new(&config),
            Err(SchoolCalError::Config(_))
        ));
    }
}
