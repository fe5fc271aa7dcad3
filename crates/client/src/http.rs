use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

/// Error type for HTTP client operations.
#[derive(Debug)]
pub enum ClientError {
    /// The request never produced a usable response body.
    Transport(reqwest::Error),
    /// The request body could not be encoded as JSON.
    Serialize(serde_json::Error),
    /// The server answered outside 200..300; `data` carries the parsed
    /// error body.
    Status {
        status: StatusCode,
        status_text: String,
        data: Value,
    },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(err) => write!(f, "request failed: {err}"),
            ClientError::Serialize(err) => write!(f, "request body is not serializable: {err}"),
            ClientError::Status { status, .. } => write!(f, "HTTP error: {status}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(err) => Some(err),
            ClientError::Serialize(err) => Some(err),
            ClientError::Status { .. } => None,
        }
    }
}

/// Per-call options for `HttpClient::request`. The default is a GET with no
/// extra headers and no body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// Small JSON-over-HTTP wrapper around one base URL.
///
/// Default headers (`Content-Type: application/json`) are merged with the
/// per-call headers; the call wins on conflict. Bodies are serialized to
/// JSON text, responses parsed from it. Failures are logged and re-raised;
/// there is no retry and no timeout beyond the driver's defaults.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    default_headers: HeaderMap,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            base_url: base_url.to_string(),
            default_headers,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);

        let mut headers = self.default_headers.clone();
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut request = self
            .client
            .request(options.method.clone(), url.as_str())
            .headers(headers);
        if let Some(body) = &options.body {
            let payload = serde_json::to_vec(body).map_err(ClientError::Serialize)?;
            request = request.body(payload);
        }

        let response = request.send().await.map_err(|err| {
            error!("request to {url} failed: {err}");
            ClientError::Transport(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            let data: Value = response.json().await.map_err(|err| {
                error!("error body from {url} is not JSON: {err}");
                ClientError::Transport(err)
            })?;
            let err = ClientError::Status {
                status,
                status_text: status.canonical_reason().unwrap_or("unknown").to_string(),
                data,
            };
            error!("request to {url} failed: {err}");
            return Err(err);
        }

        response.json::<T>().await.map_err(|err| {
            error!("response from {url} is not decodable: {err}");
            ClientError::Transport(err)
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(path, RequestOptions::default()).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<T, ClientError> {
        self.request(
            path,
            RequestOptions {
                method: Method::POST,
                body: Some(body),
                ..RequestOptions::default()
            },
        )
        .await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<T, ClientError> {
        self.request(
            path,
            RequestOptions {
                method: Method::PUT,
                body: Some(body),
                ..RequestOptions::default()
            },
        )
        .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(
            path,
            RequestOptions {
                method: Method::DELETE,
                ..RequestOptions::default()
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientError, HttpClient, RequestOptions};
    use reqwest::header::{CONTENT_TYPE, HeaderValue};
    use serde_json::{Value, json};
    use std::io::Read;

    fn json_header() -> tiny_http::Header {
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
            .expect("header")
    }

    fn spawn_server<F>(handler: F) -> String
    where
        F: Fn(tiny_http::Request) + Send + 'static,
    {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock server");
        let addr = server.server_addr().to_ip().expect("ip address");
        std::thread::spawn(move || {
            for request in server.incoming_requests() {
                handler(request);
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn get_decodes_success_body() {
        let base = spawn_server(|request| {
            let response =
                tiny_http::Response::from_string(r#"[{"ok":true}]"#).with_header(json_header());
            let _ = request.respond(response);
        });
        let client = HttpClient::new(&base);
        let value: Vec<Value> = client.get("/get/points").await.expect("request");
        assert_eq!(value, vec![json!({"ok": true})]);
    }

    #[tokio::test]
    async fn non_success_carries_status_and_parsed_body() {
        let base = spawn_server(|request| {
            let response = tiny_http::Response::from_string(
                r#"{"code":"points_unavailable","message":"database down"}"#,
            )
            .with_status_code(500)
            .with_header(json_header());
            let _ = request.respond(response);
        });
        let client = HttpClient::new(&base);
        let err = client
            .get::<Value>("/get/points")
            .await
            .expect_err("must fail");
        match err {
            ClientError::Status {
                status,
                status_text,
                data,
            } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(status_text, "Internal Server Error");
                assert_eq!(data["code"], "points_unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn call_headers_override_defaults() {
        let base = spawn_server(|request| {
            let content_type = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_string())
                .unwrap_or_default();
            let body = json!({ "content_type": content_type }).to_string();
            let _ = request.respond(
                tiny_http::Response::from_string(body).with_header(json_header()),
            );
        });
        let client = HttpClient::new(&base);

        let mut options = RequestOptions::default();
        options
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let value: Value = client.request("/echo", options).await.expect("request");
        assert_eq!(value["content_type"], "text/plain");

        let value: Value = client.get("/echo").await.expect("request");
        assert_eq!(value["content_type"], "application/json");
    }

    #[tokio::test]
    async fn post_sends_serialized_json_body() {
        let base = spawn_server(|mut request| {
            let mut body = String::new();
            request
                .as_reader()
                .read_to_string(&mut body)
                .expect("read body");
            let _ = request
                .respond(tiny_http::Response::from_string(body).with_header(json_header()));
        });
        let client = HttpClient::new(&base);
        let echoed: Value = client
            .post("/points", json!({"name": "Mina El Diamante"}))
            .await
            .expect("request");
        assert_eq!(echoed, json!({"name": "Mina El Diamante"}));
    }
}
