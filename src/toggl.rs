//! Toggl APIクライアントモジュール

use crate::config::Config;
use crate::error::RemoteError;
use crate::holiday::HolidayEntry;
use reqwest::blocking::{Client, Request};
use serde::Serialize;
use tracing::debug;

/// 時間エントリ作成エンドポイント
pub const TIME_ENTRIES_URL: &str = "https://api.track.toggl.com/api/v9/time_entries";

/// Basic認証のパスワード（APIトークン認証時の固定値）
const AUTH_PASSWORD: &str = "api_token";
const CREATED_WITH: &str = "Toggl API script";
const HOLIDAY_TAG: &str = "holiday";
/// エントリの開始時刻（UTC）
const START_TIME_UTC: &str = "04:00:00Z";

/// 休暇エントリの登録先
pub trait TimeEntrySink {
    fn create_time_entry(&self, entry: &HolidayEntry) -> Result<(), RemoteError>;
}

/// 時間エントリ作成リクエストのボディ
#[derive(Debug, Serialize)]
struct TimeEntryRequest<'a> {
    description: &'a str,
    tags: [&'static str; 1],
    start: String,
    duration: i64,
    wid: i64,
    pid: i64,
    created_with: &'static str,
}

/// Toggl APIクライアント
pub struct TogglClient {
    http: Client,
    endpoint: String,
    config: Config,
}

impl TogglClient {
    /// 本番エンドポイント向けのクライアントを作成
    pub fn new(config: Config) -> Self {
        Self::with_endpoint(config, TIME_ENTRIES_URL)
    }

    /// 任意のエンドポイント向けのクライアントを作成
    pub fn with_endpoint(config: Config, endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            config,
        }
    }

    /// エントリ1件分のPOSTリクエストを組み立てる
    fn build_request(&self, entry: &HolidayEntry) -> Result<Request, RemoteError> {
        let body = TimeEntryRequest {
            description: &entry.description,
            tags: [HOLIDAY_TAG],
            start: format!("{}T{}", entry.date_string(), START_TIME_UTC),
            duration: entry.duration,
            wid: self.config.workspace_id,
            pid: self.config.project_id,
            created_with: CREATED_WITH,
        };

        let request = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.config.api_token, Some(AUTH_PASSWORD))
            .json(&body)
            .build()?;
        Ok(request)
    }
}

impl TimeEntrySink for TogglClient {
    fn create_time_entry(&self, entry: &HolidayEntry) -> Result<(), RemoteError> {
        let request = self.build_request(entry)?;
        debug!(endpoint = %self.endpoint, date = %entry.date_string(), "POST time entry");

        let response = self.http.execute(request)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(RemoteError::Status { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::{parse_date, HOLIDAY_DURATION_SECONDS};
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use reqwest::StatusCode;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn test_config() -> Config {
        Config {
            api_token: "my-token".to_string(),
            workspace_id: 111,
            project_id: 222,
        }
    }

    fn test_entry() -> HolidayEntry {
        HolidayEntry {
            description: "New Year Break".to_string(),
            date: parse_date("2024-01-02").unwrap(),
            duration: HOLIDAY_DURATION_SECONDS,
        }
    }

    /// 1リクエストだけ受け付けて指定のレスポンスを返すスタブサーバー
    ///
    /// 受信したリクエスト（ヘッダー＋ボディ）を文字列で返す。
    fn spawn_stub_server(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/api/v9/time_entries", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut head = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                head.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut payload = vec![0; content_length];
            reader.read_exact(&mut payload).unwrap();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            reader.get_mut().write_all(response.as_bytes()).unwrap();

            head + &String::from_utf8(payload).unwrap()
        });

        (url, handle)
    }

    #[test]
    fn test_request_headers() {
        let client = TogglClient::new(test_config());
        let request = client.build_request(&test_entry()).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), TIME_ENTRIES_URL);
        assert_eq!(
            request.headers()[CONTENT_TYPE].to_str().unwrap(),
            "application/json"
        );
        // base64("my-token:api_token")
        assert_eq!(
            request.headers()[AUTHORIZATION].to_str().unwrap(),
            "Basic bXktdG9rZW46YXBpX3Rva2Vu"
        );
    }

    #[test]
    fn test_request_body() {
        let client = TogglClient::new(test_config());
        let request = client.build_request(&test_entry()).unwrap();

        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(bytes).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "description": "New Year Break",
                "tags": ["holiday"],
                "start": "2024-01-02T04:00:00Z",
                "duration": 27000,
                "wid": 111,
                "pid": 222,
                "created_with": "Toggl API script"
            })
        );
    }

    #[test]
    fn test_create_time_entry_success() {
        let (url, handle) = spawn_stub_server("200 OK", r#"{"id":1}"#);
        let client = TogglClient::with_endpoint(test_config(), url);

        assert!(client.create_time_entry(&test_entry()).is_ok());

        let received = handle.join().unwrap();
        assert!(received.starts_with("POST /api/v9/time_entries"));
        assert!(received.contains("\"start\":\"2024-01-02T04:00:00Z\""));
    }

    #[test]
    fn test_create_time_entry_error_status() {
        let (url, handle) = spawn_stub_server("400 Bad Request", r#""entry already exists""#);
        let client = TogglClient::with_endpoint(test_config(), url);

        let err = client.create_time_entry(&test_entry()).unwrap_err();
        handle.join().unwrap();

        match &err {
            RemoteError::Status { status, body } => {
                assert_eq!(*status, StatusCode::BAD_REQUEST);
                assert_eq!(body, r#""entry already exists""#);
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
        assert_eq!(err.detail(), r#""entry already exists""#);
    }

    #[test]
    fn test_create_time_entry_unreachable() {
        // バインドしてすぐ閉じたポートには接続できない
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = TogglClient::with_endpoint(test_config(), format!("http://{}/", addr));

        let err = client.create_time_entry(&test_entry()).unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
        assert!(!err.detail().is_empty());
    }
}
