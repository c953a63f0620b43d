// Copyright 2026, The kquery authors
// SPDX-License-Identifier: Apache-2.0

//! Process-wide registry for the cluster client and identity.

use std::sync::{Arc, RwLock};

use kube::{Client, Config};
use tracing::{info, instrument};

use crate::config::ClientEnv;
use crate::error::Result;
use crate::kubernetes::{build_client, resolve_config, resolve_identity, ClusterIdentity};

/// Immutable snapshot published by the registry: the API client plus the
/// identity derived at initialization.
#[derive(Clone)]
pub struct ClusterContext {
    client: Client,
    identity: ClusterIdentity,
}

impl ClusterContext {
    /// Client for issuing API requests against the cluster
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn identity(&self) -> &ClusterIdentity {
        &self.identity
    }
}

/// Holds the cluster client and identity for the lifetime of the process.
///
/// Constructed once at startup and shared by reference with everything that
/// talks to the cluster. [`init`](Self::init) and
/// [`set_client`](Self::set_client) publish a complete snapshot under a
/// write lock; readers see either the previous snapshot or the new one,
/// never a partial mix.
pub struct ClusterRegistry {
    inner: RwLock<Option<Arc<ClusterContext>>>,
}

impl ClusterRegistry {
    pub fn new() -> Self {
        ClusterRegistry {
            inner: RwLock::new(None),
        }
    }

    /// Initialize from the process environment.
    ///
    /// Resolves connection configuration, constructs the client, and derives
    /// the cluster identity. Returns the first error encountered; a failed
    /// initialization leaves any previously published snapshot untouched.
    pub async fn init(&self) -> Result<()> {
        self.init_with(ClientEnv::from_env(), None).await
    }

    /// Initialize with explicit environment overrides and an optional
    /// pre-resolved configuration.
    #[instrument(skip_all)]
    pub async fn init_with(&self, env: ClientEnv, config: Option<Config>) -> Result<()> {
        let resolved = resolve_config(&env, config).await?;
        let client = build_client(resolved)?;
        let identity = resolve_identity(&client, &env).await?;
        info!("Connected to cluster {} ({})", identity.name, identity.uid);

        self.publish(ClusterContext { client, identity });
        Ok(())
    }

    /// Replace the published client and identity, for substituting a test
    /// double.
    pub fn set_client(&self, client: Client, uid: String, name: String) {
        self.publish(ClusterContext {
            client,
            identity: ClusterIdentity { uid, name },
        });
    }

    fn publish(&self, context: ClusterContext) {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        *inner = Some(Arc::new(context));
    }

    /// Current snapshot, or `None` before initialization
    pub fn snapshot(&self) -> Option<Arc<ClusterContext>> {
        self.inner.read().expect("registry lock poisoned").clone()
    }

    /// Client for issuing API requests, or `None` before initialization
    pub fn client(&self) -> Option<Client> {
        self.snapshot().map(|ctx| ctx.client.clone())
    }

    /// Unique identifier of the cluster, the `kube-system` namespace UID
    pub fn cluster_uid(&self) -> Option<String> {
        self.snapshot().map(|ctx| ctx.identity.uid.clone())
    }

    /// Display name of the cluster
    pub fn cluster_name(&self) -> Option<String> {
        self.snapshot().map(|ctx| ctx.identity.name.clone())
    }
}

impl Default for ClusterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
