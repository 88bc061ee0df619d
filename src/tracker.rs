//! Fire-and-forget activity reporting.
//!
//! Every report is sent on its own task. Callers never wait for delivery and
//! never see a failure; both outcomes only end up in the log.

use crate::api::wire::ActivityBody;
use crate::api::ApiError;
use crate::config::Config;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Kind of user activity being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Search,
    Link,
    Category,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Link => "link",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub kind: ActivityKind,
    pub label: String,
    pub link: String,
}

/// Destination of activity reports
#[async_trait::async_trait]
pub trait ActivitySink: Send + Sync {
    async fn send(&self, activity: &Activity) -> Result<(), ApiError>;
}

/// Posts reports as JSON to the tracking endpoint
pub struct HttpActivitySink {
    client: reqwest::Client,
    url: String,
}

impl HttpActivitySink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            url: url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            config.endpoints.track.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }
}

#[async_trait::async_trait]
impl ActivitySink for HttpActivitySink {
    async fn send(&self, activity: &Activity) -> Result<(), ApiError> {
        let body = ActivityBody {
            kind: activity.kind.as_str(),
            title: &activity.label,
            weblink: &activity.link,
        };

        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        // The acknowledgement carries nothing we act on.
        let ack = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: ack,
            });
        }

        tracing::trace!(ack = %ack, "tracking endpoint acknowledged");
        Ok(())
    }
}

/// Handle used by the widget to report activity
#[derive(Clone)]
pub struct Tracker {
    sink: Arc<dyn ActivitySink>,
}

impl Tracker {
    pub fn new(sink: Arc<dyn ActivitySink>) -> Self {
        Self { sink }
    }

    /// Report an activity without waiting for it to be delivered
    pub fn report(&self, kind: ActivityKind, label: impl Into<String>, link: impl Into<String>) {
        let activity = Activity {
            kind,
            label: label.into(),
            link: link.into(),
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(kind = %activity.kind, "no async runtime, activity not reported");
            return;
        };

        let sink = self.sink.clone();
        handle.spawn(async move {
            match sink.send(&activity).await {
                Ok(()) => tracing::debug!(
                    kind = %activity.kind,
                    label = %activity.label,
                    "activity reported"
                ),
                Err(e) => tracing::warn!(
                    kind = %activity.kind,
                    label = %activity.label,
                    error = %e,
                    "failed to report activity"
                ),
            }
        });
    }
}
