// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;

use crate::config::AppConfig;

/// printhunt model search server
#[derive(Parser, Debug, Default)]
#[command(name = "printhunt")]
#[command(version)]
#[command(about = "Search 3D-printable models across six repositories", long_about = None)]
pub struct Cli {
    /// Listen port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Override environment configuration with explicit flags
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.search.upstream_timeout_secs = timeout;
        }
    }
}
