// Copyright 2026, The kquery authors
// SPDX-License-Identifier: Apache-2.0

//! Cluster configuration resolution and client construction

use std::path::PathBuf;
use std::time::Duration;

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{client::ClientBuilder, Client, Config};
use tower::buffer::BufferLayer;
use tower::limit::RateLimitLayer;
use tower::ServiceBuilder;
use tracing::{debug, instrument};

use crate::config::ClientEnv;
use crate::constants;
use crate::error::{KqueryError, Result};

/// Connection settings for a direct token/address configuration.
///
/// Only the environment-override path produces these; the in-cluster and
/// kubeconfig paths resolve straight to a [`kube::Config`] and keep the
/// TLS posture and limits of their source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub cluster_url: String,
    pub token: String,
    pub accept_invalid_certs: bool,
    pub timeout: Duration,
    pub qps: u64,
    pub burst: usize,
}

impl ClientSettings {
    /// Settings for a direct connection to `addr` authenticated by `token`
    pub fn direct(token: String, addr: String) -> Self {
        ClientSettings {
            cluster_url: addr,
            token,
            accept_invalid_certs: true,
            timeout: Duration::from_secs(constants::direct::TIMEOUT_SECS),
            qps: constants::direct::QPS,
            burst: constants::direct::BURST,
        }
    }

    /// Build a client for these settings, honoring the QPS/burst limits
    /// through a buffered rate-limit layer on the client service.
    pub fn into_client(self) -> Result<Client> {
        let cluster_url: http::Uri = self.cluster_url.parse().map_err(|e| {
            KqueryError::ClientConstruction(format!(
                "Invalid cluster address {}: {}",
                self.cluster_url, e
            ))
        })?;

        let mut config = Config::new(cluster_url);
        config.accept_invalid_certs = self.accept_invalid_certs;
        config.connect_timeout = Some(self.timeout);
        config.read_timeout = Some(self.timeout);
        config.auth_info.token = Some(self.token.into());

        let limits = ServiceBuilder::new()
            .layer(BufferLayer::new(self.burst))
            .layer(RateLimitLayer::new(self.qps, Duration::from_secs(1)))
            .into_inner();

        let builder = ClientBuilder::try_from(config).map_err(|e| {
            KqueryError::ClientConstruction(format!("Failed to create client: {}", e))
        })?;
        Ok(builder.with_layer(&limits).build())
    }
}

/// Resolved configuration, tagged by the provider that produced it
#[derive(Debug)]
pub enum ResolvedConfig {
    /// Direct token/address override from the environment
    Direct(ClientSettings),
    /// Explicit, in-cluster, or kubeconfig-derived configuration
    Stock(Config),
}

/// Resolve connection configuration, trying providers in precedence order:
/// environment override, explicit configuration, in-cluster service
/// account, then the kubeconfig in the user's home directory.
#[instrument(skip_all)]
pub async fn resolve_config(env: &ClientEnv, explicit: Option<Config>) -> Result<ResolvedConfig> {
    let kubeconfig = dirs::home_dir().map(|home| home.join(".kube").join("config"));
    resolve_config_at(env, explicit, kubeconfig).await
}

async fn resolve_config_at(
    env: &ClientEnv,
    explicit: Option<Config>,
    kubeconfig: Option<PathBuf>,
) -> Result<ResolvedConfig> {
    if let (Some(token), Some(addr)) = (env.token.as_ref(), env.addr.as_ref()) {
        debug!("Using token/address configuration from environment");
        return Ok(ResolvedConfig::Direct(ClientSettings::direct(
            token.clone(),
            addr.clone(),
        )));
    }

    if let Some(config) = explicit {
        debug!("Using explicitly provided configuration");
        return Ok(ResolvedConfig::Stock(config));
    }

    match Config::incluster() {
        Ok(config) => {
            debug!("Using in-cluster configuration");
            Ok(ResolvedConfig::Stock(config))
        }
        Err(e) => {
            // A missing or unreadable kubeconfig keeps the in-cluster error;
            // only a file that exists but fails to parse reports its own.
            let incluster_err = KqueryError::ConfigResolution(format!(
                "In-cluster configuration unavailable: {}",
                e
            ));
            let Some(path) = kubeconfig else {
                return Err(incluster_err);
            };
            let Ok(content) = std::fs::read_to_string(&path) else {
                return Err(incluster_err);
            };
            debug!("Using kubeconfig at {}", path.display());
            from_kubeconfig(&content).await.map(ResolvedConfig::Stock)
        }
    }
}

/// Parse kubeconfig file contents into a client configuration
async fn from_kubeconfig(content: &str) -> Result<Config> {
    let kubeconfig: Kubeconfig = serde_yaml::from_str(content)
        .map_err(|e| KqueryError::ConfigResolution(format!("Failed to parse kubeconfig: {}", e)))?;

    Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| {
            KqueryError::ConfigResolution(format!(
                "Failed to create config from kubeconfig: {}",
                e
            ))
        })
}

/// Construct a client for the resolved configuration
pub fn build_client(resolved: ResolvedConfig) -> Result<Client> {
    match resolved {
        ResolvedConfig::Direct(settings) => settings.into_client(),
        ResolvedConfig::Stock(config) => Client::try_from(config).map_err(|e| {
            KqueryError::ClientConstruction(format!("Failed to create client: {}", e))
        }),
    }
}
