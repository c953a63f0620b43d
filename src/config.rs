// Copyright 2026, The kquery authors
// SPDX-License-Identifier: Apache-2.0
use std::env;

use crate::constants;

/// Environment overrides for connection and identity resolution.
///
/// Captured once with [`ClientEnv::from_env`] and passed by value, so that
/// resolution precedence is testable without mutating the process
/// environment. An unset or empty variable is `None`.
#[derive(Debug, Clone, Default)]
pub struct ClientEnv {
    pub token: Option<String>,
    pub addr: Option<String>,
    pub cluster_name: Option<String>,
    pub cluster_uid: Option<String>,
}

impl ClientEnv {
    /// Read the `KQ_*` overrides from the process environment
    pub fn from_env() -> Self {
        ClientEnv {
            token: non_empty(constants::env::TOKEN),
            addr: non_empty(constants::env::ADDR),
            cluster_name: non_empty(constants::env::CLUSTER_NAME),
            cluster_uid: non_empty(constants::env::CLUSTER_UID),
        }
    }
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.is_empty())
}
