//! Shared client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration of the shared, pooled HTTP client
///
/// Per-call overrides never touch this value; see [`crate::derive::DerivedConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout (write + read), `None` for unbounded
    #[serde(default = "default_timeout")]
    pub timeout: Option<Duration>,

    /// Connection timeout, `None` for unbounded
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Option<Duration>,

    /// HTTP/HTTPS proxy URL used when a call does not supply its own
    #[serde(default)]
    pub proxy: Option<String>,

    /// Custom user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum redirects to follow (0 = no redirects)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Enable connection pooling
    #[serde(default = "default_pool_enabled")]
    pub pool_enabled: bool,

    /// Pool idle timeout
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            proxy: None,
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            pool_enabled: default_pool_enabled(),
            pool_idle_timeout: default_pool_idle_timeout(),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config for fast operations (5s timeout, 2s connect)
    pub fn fast() -> Self {
        Self {
            timeout: Some(Duration::from_secs(5)),
            connect_timeout: Some(Duration::from_secs(2)),
            ..Default::default()
        }
    }

    /// Create config for long operations (60s timeout, 10s connect)
    pub fn long() -> Self {
        Self {
            timeout: Some(Duration::from_secs(60)),
            connect_timeout: Some(Duration::from_secs(10)),
            ..Default::default()
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Disable both the request and the connection timeout
    pub fn without_timeouts(mut self) -> Self {
        self.timeout = None;
        self.connect_timeout = None;
        self
    }

    /// Set proxy URL
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Disable connection pooling
    pub fn without_pool(mut self) -> Self {
        self.pool_enabled = false;
        self
    }
}

// Default value functions for serde
fn default_timeout() -> Option<Duration> {
    Some(Duration::from_secs(10))
}

fn default_connect_timeout() -> Option<Duration> {
    Some(Duration::from_secs(10))
}

fn default_user_agent() -> String {
    format!("postkit/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_redirects() -> usize {
    10
}

fn default_pool_enabled() -> bool {
    true
}

fn default_pool_idle_timeout() -> Duration {
    Duration::from_secs(300)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert!(config.proxy.is_none());
        assert!(config.pool_enabled);
    }

    #[test]
    fn test_fast_config() {
        let config = HttpConfig::fast();
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_long_config() {
        let config = HttpConfig::long();
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_builder_pattern() {
        let config = HttpConfig::new()
            .with_timeout(Duration::from_secs(15))
            .with_connect_timeout(Duration::from_secs(3))
            .with_proxy("http://proxy.example.com:8080")
            .with_user_agent("tests/1.0");

        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.proxy, Some("http://proxy.example.com:8080".to_string()));
        assert_eq!(config.user_agent, "tests/1.0");
    }

    #[test]
    fn test_without_timeouts() {
        let config = HttpConfig::default().without_timeouts();
        assert!(config.timeout.is_none());
        assert!(config.connect_timeout.is_none());
    }
}
