//! Per-call client configuration derived from the shared one
//!
//! A [`DerivedConfig`] is computed from a borrowed [`HttpConfig`] and the
//! per-call overrides. The shared config and the shared client are never
//! mutated, so concurrent calls cannot observe each other's overrides.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::{
    config::HttpConfig,
    credentials,
    error::{HttpError, Result},
    request::{CallTimeout, ProxySettings},
};

/// Effective transport settings for a single call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedConfig {
    config: HttpConfig,
    proxy: Option<ProxySettings>,
    overridden: bool,
}

impl DerivedConfig {
    /// Settings of the shared client itself
    pub fn shared(base: &HttpConfig) -> Self {
        Self {
            config: base.clone(),
            proxy: base.proxy.as_ref().map(ProxySettings::new),
            overridden: false,
        }
    }

    /// Apply per-call overrides on top of `base`
    pub fn from_base(base: &HttpConfig, timeout: CallTimeout, proxy: Option<&ProxySettings>) -> Self {
        let mut derived = Self::shared(base);

        match timeout {
            CallTimeout::Default => {}
            CallTimeout::Unbounded => {
                derived.config.timeout = None;
                derived.config.connect_timeout = None;
                derived.overridden = true;
            }
            CallTimeout::Bounded(bound) => {
                derived.config.timeout = Some(bound);
                derived.config.connect_timeout = Some(bound);
                derived.overridden = true;
            }
        }

        if let Some(proxy) = proxy {
            derived.config.proxy = Some(proxy.url.clone());
            derived.proxy = Some(proxy.clone());
            derived.overridden = true;
        }

        derived
    }

    /// Whole-request timeout (covers write and read)
    pub fn timeout(&self) -> Option<Duration> {
        self.config.timeout
    }

    /// Connection timeout
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.config.connect_timeout
    }

    /// Proxy in effect for the call
    pub fn proxy(&self) -> Option<&ProxySettings> {
        self.proxy.as_ref()
    }

    /// Whether the call needs a client other than the shared one
    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// Build a transport client with these settings
    pub fn build_client(&self) -> Result<Client> {
        let config = &self.config;
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(if config.max_redirects > 0 {
                reqwest::redirect::Policy::limited(config.max_redirects)
            } else {
                reqwest::redirect::Policy::none()
            });

        if let Some(settings) = &self.proxy {
            let mut proxy = reqwest::Proxy::all(settings.url.as_str())
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            // Sent with plain HTTP requests and on CONNECT for HTTPS targets
            if let Some((username, password)) = settings.credentials() {
                proxy = proxy.custom_http_auth(credentials::basic(username, password)?);
            }
            builder = builder.proxy(proxy);
        }

        if config.pool_enabled {
            builder = builder.pool_idle_timeout(config.pool_idle_timeout);
        } else {
            builder = builder.pool_max_idle_per_host(0);
        }

        builder
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))
    }
}
