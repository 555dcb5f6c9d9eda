/// Fire-and-forget forwarding of bookmark events to the UGC analytics API.
use bearer_auth::{with_retry, RetryConfig};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct BookmarkEvent {
    film_id: Uuid,
    user_id: Uuid,
    timestamp: i64,
}

/// Posts new-bookmark events to an external analytics endpoint, retrying
/// transient transport errors. Delivery is best effort and never blocks the
/// API response path.
#[derive(Clone)]
pub struct LogForwarder {
    http: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl LogForwarder {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            retry: RetryConfig::default(),
        }
    }

    /// Spawn the delivery in the background; errors are logged, not returned.
    pub fn forward_bookmark(&self, film_id: Uuid, user_id: Uuid, timestamp: i64) {
        let forwarder = self.clone();
        tokio::spawn(async move {
            let event = BookmarkEvent {
                film_id,
                user_id,
                timestamp,
            };
            let url = format!("{}/film/views", forwarder.base_url);

            let result = with_retry(&forwarder.retry, || {
                forwarder.http.post(&url).json(&event).send()
            })
            .await;

            match result {
                Ok(response) => {
                    debug!("bookmark event forwarded: {}", response.status());
                }
                Err(e) => {
                    warn!("failed to forward bookmark event: {}", e);
                }
            }
        });
    }
}
