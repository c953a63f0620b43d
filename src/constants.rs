// Copyright 2026, The kquery authors
// SPDX-License-Identifier: Apache-2.0

/// Environment variables consumed by the client registry
pub mod env {
    /// Bearer token for a direct API server connection
    pub const TOKEN: &str = "KQ_TOKEN";
    /// API server address for a direct connection
    pub const ADDR: &str = "KQ_ADDR";
    /// Overrides the cluster display name reported by the API
    pub const CLUSTER_NAME: &str = "KQ_CLUSTER_NAME";
    /// Overrides the cluster UID reported by the API
    pub const CLUSTER_UID: &str = "KQ_CLUSTER_UID";
}

/// Defaults applied to direct token/address connections
pub mod direct {
    /// Request timeout in seconds
    pub const TIMEOUT_SECS: u64 = 10;
    /// Sustained request rate against the API server
    pub const QPS: u64 = 250;
    /// Requests allowed to queue above the sustained rate
    pub const BURST: usize = 1000;
}

/// Namespace whose UID serves as the stable cluster identifier
pub const CLUSTER_ID_NAMESPACE: &str = "kube-system";

/// Annotation on the identity namespace carrying the cluster display name
pub const CLUSTER_NAME_ANNOTATION: &str = "kquery.io/cluster-name";
