use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value as JsonValue;

use super::config::RqliteOptions;
use super::Transport;
use crate::error::RqliteDbError;
use crate::results::{WireResponse, WireResult};
use crate::statement::Statement;

/// Blocking HTTP client for the engine's `/db/execute` and `/db/query` API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    options: RqliteOptions,
}

impl HttpTransport {
    /// Build the HTTP client from `options`.
    ///
    /// # Errors
    /// [`RqliteDbError::ConfigError`] when the CA certificate cannot be read
    /// or parsed, [`RqliteDbError::Http`] when the client cannot be built.
    pub fn new(options: RqliteOptions) -> Result<Self, RqliteDbError> {
        let mut builder = Client::builder();
        if !options.timeout.is_zero() {
            builder = builder.timeout(options.timeout);
        }
        if let Some(path) = &options.ca_cert {
            let pem = std::fs::read(path).map_err(|e| {
                RqliteDbError::ConfigError(format!("cacert {}: {e}", path.display()))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| RqliteDbError::ConfigError(format!("cacert {}: {e}", path.display())))?;
            builder = builder.add_root_certificate(cert);
        }
        if options.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }
        Ok(Self {
            client: builder.build()?,
            options,
        })
    }

    #[must_use]
    pub fn options(&self) -> &RqliteOptions {
        &self.options
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.options.base_url.trim_end_matches('/'))
    }

    fn endpoint(&self, path: &str, transaction: bool) -> String {
        format!("{}{}", self.url(path), self.options.query_params(transaction))
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match (&self.options.user, &self.options.password) {
            (None, None) => request,
            (user, password) => request.basic_auth(
                user.as_deref().unwrap_or_default(),
                password.as_deref(),
            ),
        }
    }

    fn send(request: RequestBuilder, url: &str) -> Result<String, RqliteDbError> {
        let response: Response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        if status != StatusCode::OK {
            return Err(RqliteDbError::Transport(format!(
                "HTTP response error from {url}: [{}] {body}",
                status.as_u16()
            )));
        }
        Ok(body)
    }

    fn post(&self, path: &str, transaction: bool, statements: &[Statement]) -> Result<Vec<WireResult>, RqliteDbError> {
        let payload = statements
            .iter()
            .map(Statement::build)
            .collect::<Result<Vec<_>, _>>()?;
        let body = JsonValue::Array(payload).to_string();
        let url = self.endpoint(path, transaction);
        tracing::debug!("POST {} body={}", url, body);
        let request = self
            .with_auth(self.client.post(&url))
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let text = Self::send(request, &url)?;
        Ok(WireResponse::from_json(&text)?.results)
    }

    fn get(&self, path: &str) -> Result<String, RqliteDbError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        Self::send(self.with_auth(self.client.get(&url)), &url)
    }

    /// Node status document from `/status`.
    ///
    /// # Errors
    /// Transport failures and undecodable JSON.
    pub fn status(&self) -> Result<JsonValue, RqliteDbError> {
        Ok(serde_json::from_str(&self.get("/status")?)?)
    }

    /// Cluster membership from `/nodes`.
    ///
    /// # Errors
    /// Transport failures and undecodable JSON.
    pub fn nodes(&self) -> Result<JsonValue, RqliteDbError> {
        Ok(serde_json::from_str(&self.get("/nodes")?)?)
    }

    /// Readiness text from `/readyz`.
    ///
    /// # Errors
    /// Transport failures, including a not-ready status.
    pub fn ready(&self) -> Result<String, RqliteDbError> {
        self.get("/readyz")
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        statements: &[Statement],
        transaction: bool,
    ) -> Result<Vec<WireResult>, RqliteDbError> {
        self.post("/db/execute", transaction, statements)
    }

    fn query(&self, statements: &[Statement]) -> Result<Vec<WireResult>, RqliteDbError> {
        self.post("/db/query", false, statements)
    }

    fn transaction_default(&self) -> bool {
        self.options.transaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slashes() {
        let transport = HttpTransport::new(RqliteOptions::new("http://localhost:4001/")).unwrap();
        assert_eq!(transport.url("/db/query"), "http://localhost:4001/db/query");
    }

    #[test]
    fn executor_writes_follow_the_transaction_option() {
        use crate::executor::Executor;

        let on = HttpTransport::new(RqliteOptions::from_properties([("transaction", "true")]).unwrap())
            .unwrap();
        let exec = Executor::new(&on);
        assert!(exec.is_transaction());
        assert_eq!(
            on.endpoint("/db/execute", exec.is_transaction()),
            "http://localhost:4001/db/execute?transaction=true&timings=true&timeout=5s&wait=true\
             &level=linearizable&linearizable_timeout=5s&freshness=5s&freshness_strict=false"
        );

        let off = HttpTransport::new(
            RqliteOptions::builder("http://localhost:4001")
                .with_transaction(false)
                .finish(),
        )
        .unwrap();
        let exec = Executor::new(&off);
        assert!(!exec.is_transaction());
        assert!(!off.endpoint("/db/execute", exec.is_transaction()).contains("transaction="));
        assert!(exec.with_transaction(true).is_transaction());
    }

    #[test]
    fn unreadable_ca_cert_is_a_config_error() {
        let opts = RqliteOptions::builder("https://localhost:4001")
            .with_ca_cert("/nonexistent/ca.pem")
            .finish();
        assert!(matches!(
            HttpTransport::new(opts),
            Err(RqliteDbError::ConfigError(_))
        ));
    }

    #[test]
    fn blank_statements_fail_before_any_request() {
        let transport = HttpTransport::new(RqliteOptions::default()).unwrap();
        assert!(matches!(
            transport.query(&[Statement::new("")]),
            Err(RqliteDbError::StateError(_))
        ));
    }
}
