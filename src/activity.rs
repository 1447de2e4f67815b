use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::config::ActivityLogConfig;

pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(5);

const INSERT_SQL: &str = "INSERT INTO activity_logs (action, detail, created_at) VALUES (?, ?, ?)";

/// Records named business events in a remote activity log.
#[async_trait]
pub trait ActivityLogger: Send + Sync {
    async fn record(&self, action: &str, detail: &str, at: OffsetDateTime) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
struct ExecRequest {
    statements: Vec<Statement>,
}

#[derive(Debug, Serialize)]
struct Statement {
    sql: &'static str,
    args: Vec<String>,
}

fn exec_request(action: &str, detail: &str, at: OffsetDateTime) -> anyhow::Result<ExecRequest> {
    let at = at.format(&Rfc3339).context("format activity timestamp")?;
    Ok(ExecRequest {
        statements: vec![Statement {
            sql: INSERT_SQL,
            args: vec![action.to_string(), detail.to_string(), at],
        }],
    })
}

/// Posts insert statements to an HTTP SQL endpoint. No-op without a URL.
#[derive(Clone)]
pub struct HttpActivityLogger {
    client: reqwest::Client,
    url: Option<String>,
    token: Option<String>,
}

impl HttpActivityLogger {
    pub fn new(cfg: &ActivityLogConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .context("build activity log client")?;
        Ok(Self {
            client,
            url: cfg.url.clone(),
            token: cfg.token.clone(),
        })
    }
}

#[async_trait]
impl ActivityLogger for HttpActivityLogger {
    async fn record(&self, action: &str, detail: &str, at: OffsetDateTime) -> anyhow::Result<()> {
        let Some(url) = self.url.as_deref() else {
            return Ok(());
        };
        let body = exec_request(action, detail, at)?;
        let mut req = self.client.post(url).json(&body);
        if let Some(token) = self.token.as_deref() {
            req = req.bearer_auth(token);
        }
        req.send()
            .await
            .context("post activity log")?
            .error_for_status()
            .context("activity log rejected")?;
        Ok(())
    }
}

pub mod fake {
    use super::*;
    use tokio::sync::Mutex;

    /// Keeps `(action, detail)` pairs in memory; optionally fails every call.
    #[derive(Default)]
    pub struct RecordingActivityLogger {
        pub events: Mutex<Vec<(String, String)>>,
        pub fail: bool,
    }

    impl RecordingActivityLogger {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub async fn actions(&self) -> Vec<String> {
            self.events.lock().await.iter().map(|(a, _)| a.clone()).collect()
        }
    }

    #[async_trait]
    impl ActivityLogger for RecordingActivityLogger {
        async fn record(&self, action: &str, detail: &str, _at: OffsetDateTime) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("activity sink unavailable");
            }
            self.events
                .lock()
                .await
                .push((action.to_string(), detail.to_string()));
            Ok(())
        }
    }
}
