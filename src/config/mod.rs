// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Application configuration
//!
//! Loaded from the environment (after `.env`, see `main`) and validated once
//! at startup.

use std::env;
use std::net::{SocketAddr, ToSocketAddrs};

use thiserror::Error;

use crate::image::ImageProxyConfig;
use crate::search::SearchConfig;

/// Startup configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    #[error("Invalid listen address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top level configuration for the server
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub search: SearchConfig,
    pub image: ImageProxyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// A `PORT` that is set but not a valid port is an error rather than
    /// silently falling back to the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "PORT".to_string(),
                value: raw,
            })?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            host: env::var("HOST")
                .ok()
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),
            port,
            search: SearchConfig::from_env(),
            image: ImageProxyConfig::from_env(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate().map_err(ConfigError::Invalid)?;
        self.image.validate().map_err(ConfigError::Invalid)?;
        self.listen_addr().map(|_| ())
    }

    /// Socket address to bind; `HOST` may be an IP or a resolvable name
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::InvalidAddress {
                host: self.host.clone(),
                port: self.port,
            })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            search: SearchConfig::default(),
            image: ImageProxyConfig::default(),
        }
    }
}
