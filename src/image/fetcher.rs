// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upstream image fetching

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, REFERER};
use reqwest::redirect::Policy;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use super::proxy::validate_image_url;
use super::types::{ImageProxyError, UpstreamImage};
use crate::search::client::BROWSER_USER_AGENT;

/// Redirect hops followed before the redirect response itself is returned
pub const MAX_REDIRECTS: usize = 5;

/// Fetches raw image bytes from an upstream host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch `url`, sending `referer` unless it is empty
    async fn fetch(&self, url: &str, referer: &str) -> Result<UpstreamImage, ImageProxyError>;
}

/// Redirect target refused by the image redirect policy
#[derive(Debug, Error)]
#[error("redirect to {target} blocked")]
struct BlockedRedirect {
    target: String,
}

/// Follow a hop only if it stays on the previous origin or passes
/// `validate_image_url`. The first URL is vetted by the proxy before fetching.
fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.stop();
        }

        let same_origin = attempt
            .previous()
            .last()
            .map(|prev| prev.origin() == attempt.url().origin())
            .unwrap_or(false);
        let allowed = same_origin || validate_image_url(attempt.url().as_str()).is_ok();

        if allowed {
            attempt.follow()
        } else {
            let target = attempt.url().to_string();
            attempt.error(BlockedRedirect { target })
        }
    })
}

/// `ImageFetcher` backed by reqwest, with its own redirect policy
pub struct HttpImageFetcher {
    client: Client,
    timeout_ms: u64,
}

impl HttpImageFetcher {
    /// Build the fetcher with the browser User-Agent and `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .referer(false)
            .redirect(redirect_policy())
            .build()?;

        Ok(Self {
            client,
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> ImageProxyError {
        if let Some(blocked) = e
            .source()
            .and_then(|source| source.downcast_ref::<BlockedRedirect>())
        {
            warn!("Image fetch stopped: {}", blocked);
            return ImageProxyError::InvalidUrl {
                reason: blocked.to_string(),
            };
        }

        if e.is_timeout() {
            ImageProxyError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            ImageProxyError::Network {
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str, referer: &str) -> Result<UpstreamImage, ImageProxyError> {
        let mut request = self.client.get(url).header("Accept", "image/*,*/*;q=0.8");
        if !referer.is_empty() {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("Image upstream {} answered {}", url, status);
            return Err(ImageProxyError::Upstream {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageProxyError::Network {
                message: e.to_string(),
            })?;

        Ok(UpstreamImage {
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Redirect};
    use axum::routing::get;
    use axum::Router;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn fetcher() -> HttpImageFetcher {
        HttpImageFetcher::new(Duration::from_secs(5)).unwrap()
    }

    async fn echo_referer(headers: HeaderMap) -> String {
        headers
            .get("referer")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none")
            .to_string()
    }

    #[tokio::test]
    async fn test_referer_sent_when_present() {
        let addr = serve(Router::new().route("/img", get(echo_referer))).await;
        let url = format!("http://{}/img", addr);

        let image = fetcher()
            .fetch(&url, "https://www.printables.com/")
            .await
            .unwrap();
        assert_eq!(&image.bytes[..], b"https://www.printables.com/");
    }

    #[tokio::test]
    async fn test_referer_omitted_when_empty() {
        let addr = serve(Router::new().route("/img", get(echo_referer))).await;
        let url = format!("http://{}/img", addr);

        let image = fetcher().fetch(&url, "").await.unwrap();
        assert_eq!(&image.bytes[..], b"none");
    }

    #[tokio::test]
    async fn test_content_type_captured() {
        let app = Router::new().route(
            "/thumb.png",
            get(|| async { ([("content-type", "image/png")], vec![0x89u8, b'P', b'N', b'G']) }),
        );
        let addr = serve(app).await;

        let image = fetcher()
            .fetch(&format!("http://{}/thumb.png", addr), "")
            .await
            .unwrap();
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
        assert_eq!(&image.bytes[..], &[0x89u8, b'P', b'N', b'G'][..]);
    }

    #[tokio::test]
    async fn test_error_status_maps_to_upstream() {
        let app = Router::new()
            .route("/gone", get(|| async { StatusCode::NOT_FOUND }))
            .route("/broken", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let addr = serve(app).await;
        let fetcher = fetcher();

        let err = fetcher
            .fetch(&format!("http://{}/gone", addr), "")
            .await
            .unwrap_err();
        assert_eq!(err, ImageProxyError::Upstream { status: 404 });

        let err = fetcher
            .fetch(&format!("http://{}/broken", addr), "")
            .await
            .unwrap_err();
        assert_eq!(err, ImageProxyError::Upstream { status: 503 });
    }

    #[tokio::test]
    async fn test_same_origin_redirect_followed() {
        let app = Router::new()
            .route("/img", get(|| async { Redirect::temporary("/real") }))
            .route("/real", get(|| async { "pixels" }));
        let addr = serve(app).await;

        let image = fetcher()
            .fetch(&format!("http://{}/img", addr), "")
            .await
            .unwrap();
        assert_eq!(&image.bytes[..], b"pixels");
    }

    #[tokio::test]
    async fn test_referer_kept_across_redirect() {
        let app = Router::new()
            .route("/img", get(|| async { Redirect::temporary("/echo") }))
            .route("/echo", get(echo_referer));
        let addr = serve(app).await;

        let image = fetcher()
            .fetch(&format!("http://{}/img", addr), "https://www.thingiverse.com/")
            .await
            .unwrap();
        assert_eq!(&image.bytes[..], b"https://www.thingiverse.com/");
    }

    #[tokio::test]
    async fn test_redirect_to_internal_host_blocked() {
        let hits = Arc::new(AtomicUsize::new(0));
        let secret_hits = hits.clone();
        let internal = serve(Router::new().route(
            "/secret",
            get(move || {
                let hits = secret_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "INTERNAL-SECRET"
                }
            }),
        ))
        .await;

        let target = format!("http://{}/secret", internal);
        assert!(validate_image_url(&target).is_err());

        let public = serve(Router::new().route(
            "/img",
            get(move || {
                let target = target.clone();
                async move { Redirect::temporary(&target).into_response() }
            }),
        ))
        .await;

        let err = fetcher()
            .fetch(&format!("http://{}/img", public), "")
            .await
            .unwrap_err();
        assert!(matches!(err, ImageProxyError::InvalidUrl { .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_redirect_loop_stops_at_cap() {
        let app = Router::new().route("/loop", get(|| async { Redirect::temporary("/loop") }));
        let addr = serve(app).await;

        let err = fetcher()
            .fetch(&format!("http://{}/loop", addr), "")
            .await
            .unwrap_err();
        assert_eq!(err, ImageProxyError::Upstream { status: 307 });
    }
}
