// Copyright 2026, The kquery authors
// SPDX-License-Identifier: Apache-2.0

//! Cluster configuration resolution, client construction, and identity.

pub mod client;
pub mod identity;

pub use client::{build_client, resolve_config, ClientSettings, ResolvedConfig};
pub use identity::{resolve_identity, ClusterIdentity};
