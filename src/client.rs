use std::time::Duration;

use tracing::{debug, trace};

use crate::protocol::{parse_reply, BridgeReply};
use crate::{Error, Result};

/// HTTP side of the IR bridge. One `GET` per command, no retries.
pub(crate) struct BridgeClient {
    http: reqwest::Client,
    api_url: String,
}

impl BridgeClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url: api_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// A `messages` body counts as an acknowledgment whatever the status;
    /// any other non-2xx answer is a rejection.
    pub async fn send(&self, url: &str) -> Result<BridgeReply> {
        debug!(url = %url, "sending command to bridge");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();

        if status.as_u16() == 204 {
            trace!("bridge: no content");
            return Ok(BridgeReply::Empty);
        }

        let body = resp.text().await?;
        let reply = parse_reply(status.as_u16(), &body);
        if status.is_success() || matches!(reply, BridgeReply::Messages(_)) {
            Ok(reply)
        } else {
            Err(Error::Remote {
                status: status.as_u16(),
                body,
            })
        }
    }
}
