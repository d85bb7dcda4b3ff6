use serde_json::Value;

use crate::capabilities::ModeCapabilities;
use crate::types::AcState;

/// Query pairs for a state command. `power` always leads; the rest are only
/// sent while the unit is on, `powerful` only when the unit supports it.
pub fn command_query(state: &AcState, caps: &ModeCapabilities) -> Vec<(&'static str, String)> {
    let mut query = vec![("power", state.power.to_string())];
    if state.power {
        query.push(("mode", state.mode.as_bridge_str().to_string()));
        query.push(("temp", format_temp(state.target_temperature)));
        query.push(("swing", state.swing.to_string()));
        if caps.boost() {
            query.push(("powerful", state.boost.to_string()));
        }
    }
    query
}

pub fn command_url(api_url: &str, state: &AcState, caps: &ModeCapabilities) -> String {
    let query = command_query(state, caps)
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let sep = if api_url.contains('?') { '&' } else { '?' };
    format!("{api_url}{sep}{query}")
}

// The bridge takes whole degrees.
fn format_temp(celsius: f64) -> String {
    format!("{}", celsius.round() as i64)
}

/// Classified bridge response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeReply {
    Empty,
    /// `messages` array from a JSON body, joined by newline.
    Messages(String),
    Raw(String),
}

impl BridgeReply {
    pub fn message(&self) -> Option<&str> {
        match self {
            BridgeReply::Empty => None,
            BridgeReply::Messages(msg) | BridgeReply::Raw(msg) => {
                Some(msg.as_str()).filter(|m| !m.is_empty())
            }
        }
    }
}

pub fn parse_reply(status: u16, body: &str) -> BridgeReply {
    if status == 204 {
        return BridgeReply::Empty;
    }
    let parsed: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return raw_reply(body),
    };
    match parsed.get("messages") {
        Some(Value::Array(msgs)) => BridgeReply::Messages(
            msgs.iter()
                .map(|m| match m {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        _ => raw_reply(body),
    }
}

fn raw_reply(body: &str) -> BridgeReply {
    if body.is_empty() {
        BridgeReply::Empty
    } else {
        BridgeReply::Raw(body.to_string())
    }
}
