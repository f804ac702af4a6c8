use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::error::RqliteDbError;

/// Read consistency level requested from the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Level {
    None,
    Weak,
    Strong,
    #[default]
    Linearizable,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::None => "none",
            Level::Weak => "weak",
            Level::Strong => "strong",
            Level::Linearizable => "linearizable",
        };
        f.write_str(name)
    }
}

/// Connection and request options, passed explicitly to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RqliteOptions {
    pub base_url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Request timeout; zero disables it.
    pub timeout: Duration,
    pub transaction: bool,
    pub queue: bool,
    pub wait: bool,
    pub level: Level,
    pub linearizable_timeout: Duration,
    pub freshness: Duration,
    pub freshness_strict: bool,
    pub ca_cert: Option<PathBuf>,
    pub insecure: bool,
}

impl Default for RqliteOptions {
    fn default() -> Self {
        Self::new("http://localhost:4001")
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, RqliteDbError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(RqliteDbError::ConfigError(format!(
            "{key}: expected true or false, got [{value}]"
        ))),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration, RqliteDbError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| RqliteDbError::ConfigError(format!("{key}: [{value}] {e}")))
}

impl RqliteOptions {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user: None,
            password: None,
            timeout: Duration::from_secs(5),
            transaction: true,
            queue: false,
            wait: true,
            level: Level::Linearizable,
            linearizable_timeout: Duration::from_secs(5),
            freshness: Duration::from_secs(5),
            freshness_strict: false,
            ca_cert: None,
            insecure: false,
        }
    }

    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> RqliteOptionsBuilder {
        RqliteOptionsBuilder::new(base_url)
    }

    /// Apply string properties on top of the defaults.
    ///
    /// Recognized keys: `baseUrl`, `timeoutSec`, `transaction`, `queue`,
    /// `wait`, `level`, `linearizableTimeoutSec`, `freshnessSec`,
    /// `freshnessStrict`, `user`, `password`, `cacert`, `insecure`. Unknown
    /// keys are ignored.
    ///
    /// # Errors
    /// Returns [`RqliteDbError::ConfigError`] when a value does not parse.
    pub fn from_properties<'a>(
        props: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, RqliteDbError> {
        let mut opts = Self::default();
        for (key, value) in props {
            match key {
                "baseUrl" => opts.base_url = value.to_string(),
                "timeoutSec" => opts.timeout = parse_secs(key, value)?,
                "transaction" => opts.transaction = parse_bool(key, value)?,
                "queue" => opts.queue = parse_bool(key, value)?,
                "wait" => opts.wait = parse_bool(key, value)?,
                "level" => {
                    opts.level = Level::from_str(value.trim(), true).map_err(|e| {
                        RqliteDbError::ConfigError(format!("{key}: [{value}] {e}"))
                    })?;
                }
                "linearizableTimeoutSec" => opts.linearizable_timeout = parse_secs(key, value)?,
                "freshnessSec" => opts.freshness = parse_secs(key, value)?,
                "freshnessStrict" => opts.freshness_strict = parse_bool(key, value)?,
                "user" => opts.user = Some(value.to_string()),
                "password" => opts.password = Some(value.to_string()),
                "cacert" => opts.ca_cert = Some(PathBuf::from(value)),
                "insecure" => opts.insecure = parse_bool(key, value)?,
                _ => {}
            }
        }
        Ok(opts)
    }

    /// Request query string, including the leading `?`.
    #[must_use]
    pub fn query_params(&self, transaction: bool) -> String {
        let mut pairs = Vec::with_capacity(9);
        if transaction {
            pairs.push("transaction=true".to_string());
        }
        pairs.push("timings=true".to_string());
        pairs.push(format!("timeout={}", duration_param(self.timeout)));
        if self.queue {
            pairs.push("queue=true".to_string());
        }
        pairs.push(format!("wait={}", self.wait));
        pairs.push(format!("level={}", self.level));
        if self.level == Level::Linearizable {
            pairs.push(format!(
                "linearizable_timeout={}",
                duration_param(self.linearizable_timeout)
            ));
        }
        pairs.push(format!("freshness={}", duration_param(self.freshness)));
        pairs.push(format!("freshness_strict={}", self.freshness_strict));
        format!("?{}", pairs.join("&"))
    }
}

/// Whole seconds render as `5s`; anything finer as milliseconds, rounded up
/// so a non-zero duration never renders as zero.
fn duration_param(d: Duration) -> String {
    if d.subsec_nanos() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ms", d.as_nanos().div_ceil(1_000_000))
    }
}

/// Fluent builder for [`RqliteOptions`].
#[derive(Debug, Clone)]
pub struct RqliteOptionsBuilder {
    opts: RqliteOptions,
}

impl RqliteOptionsBuilder {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            opts: RqliteOptions::new(base_url),
        }
    }

    #[must_use]
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.opts.user = Some(user.into());
        self.opts.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_transaction(mut self, transaction: bool) -> Self {
        self.opts.transaction = transaction;
        self
    }

    #[must_use]
    pub fn with_queue(mut self, queue: bool) -> Self {
        self.opts.queue = queue;
        self
    }

    #[must_use]
    pub fn with_wait(mut self, wait: bool) -> Self {
        self.opts.wait = wait;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.opts.level = level;
        self
    }

    #[must_use]
    pub fn with_linearizable_timeout(mut self, timeout: Duration) -> Self {
        self.opts.linearizable_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_freshness(mut self, freshness: Duration, strict: bool) -> Self {
        self.opts.freshness = freshness;
        self.opts.freshness_strict = strict;
        self
    }

    #[must_use]
    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.opts.ca_cert = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.opts.insecure = insecure;
        self
    }

    #[must_use]
    pub fn finish(self) -> RqliteOptions {
        self.opts
    }

    /// Build an HTTP transport from these options.
    ///
    /// # Errors
    ///
    /// Returns `RqliteDbError` if the CA certificate cannot be read or the
    /// HTTP client cannot be constructed.
    #[cfg(feature = "http")]
    pub fn build(self) -> Result<super::HttpTransport, RqliteDbError> {
        super::HttpTransport::new(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_string() {
        let opts = RqliteOptions::default();
        assert_eq!(
            opts.query_params(true),
            "?transaction=true&timings=true&timeout=5s&wait=true&level=linearizable\
             &linearizable_timeout=5s&freshness=5s&freshness_strict=false"
        );
    }

    #[test]
    fn optional_pairs_come_and_go() {
        let opts = RqliteOptions::builder("http://db:4001")
            .with_queue(true)
            .with_level(Level::Weak)
            .with_timeout(Duration::from_secs(10))
            .finish();
        assert_eq!(
            opts.query_params(false),
            "?timings=true&timeout=10s&queue=true&wait=true&level=weak&freshness=5s&freshness_strict=false"
        );
    }

    #[test]
    fn sub_second_durations_keep_their_precision() {
        let opts = RqliteOptions::builder("http://db:4001")
            .with_level(Level::Weak)
            .with_timeout(Duration::from_millis(1500))
            .finish();
        assert!(opts.query_params(false).contains("&timeout=1500ms&"));
        assert_eq!(duration_param(Duration::from_millis(250)), "250ms");
        assert_eq!(duration_param(Duration::from_micros(1)), "1ms");
        assert_eq!(duration_param(Duration::ZERO), "0s");
        assert_eq!(duration_param(Duration::from_secs(2)), "2s");
    }

    #[test]
    fn properties_override_defaults() {
        let opts = RqliteOptions::from_properties([
            ("baseUrl", "https://db:4001"),
            ("timeoutSec", "30"),
            ("level", "STRONG"),
            ("freshnessStrict", "true"),
            ("user", "admin"),
            ("password", "s3cret"),
            ("somethingElse", "ignored"),
        ])
        .unwrap();
        assert_eq!(opts.base_url, "https://db:4001");
        assert_eq!(opts.timeout, Duration::from_secs(30));
        assert_eq!(opts.level, Level::Strong);
        assert!(opts.freshness_strict);
        assert_eq!(opts.user.as_deref(), Some("admin"));
        assert_eq!(opts.password.as_deref(), Some("s3cret"));
        assert!(opts.transaction);
    }

    #[test]
    fn bad_property_values_are_config_errors() {
        for props in [
            [("timeoutSec", "soon")],
            [("level", "eventual")],
            [("wait", "maybe")],
        ] {
            assert!(matches!(
                RqliteOptions::from_properties(props),
                Err(RqliteDbError::ConfigError(_))
            ));
        }
    }
}
