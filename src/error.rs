// Copyright 2026, The kquery authors
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KqueryError {
    #[error("Cluster configuration unresolvable: {0}")]
    ConfigResolution(String),

    #[error("Client construction failed: {0}")]
    ClientConstruction(String),

    #[error("Cluster identity lookup failed: {0}")]
    IdentityFetch(String),
}

pub type Result<T> = std::result::Result<T, KqueryError>;
