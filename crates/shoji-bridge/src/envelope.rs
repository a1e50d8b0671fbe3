//! Validation of messages posted from a view's script context.
//!
//! Wire shape (one JSON object per `window.ipc.postMessage` call):
//!
//! ```json
//! {"channel": "user", "payload": "<string>"}
//! {"channel": "internal", "payload": "<string>", "token": "<per-view token>"}
//! {"control": "scripts-ready", "token": "<per-view token>"}
//! ```

use serde::Deserialize;
use shoji_common::BridgeError;

use crate::channel::Channel;
use crate::payload::Payload;

/// Per-view acceptance rules.
#[derive(Debug, Clone)]
pub struct ChannelPolicy {
    pub sandboxed: bool,
    pub internal_token: String,
}

/// Signals from the bootstrap script itself, not from page code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// A new document started and wants its injected scripts.
    ScriptsReady,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    Message { channel: Channel, payload: Payload },
    Control(ControlSignal),
}

#[derive(Deserialize)]
struct RawEnvelope {
    channel: Option<String>,
    payload: Option<String>,
    token: Option<String>,
    control: Option<String>,
}

/// Parse and authorize one posted body.
pub fn parse_inbound(body: &str, policy: &ChannelPolicy) -> Result<Inbound, BridgeError> {
    let raw: RawEnvelope = serde_json::from_str(body)
        .map_err(|e| BridgeError::MalformedEnvelope(e.to_string()))?;

    let token_ok = raw.token.as_deref() == Some(policy.internal_token.as_str());

    if let Some(control) = raw.control {
        if !token_ok {
            return Err(BridgeError::Rejected {
                channel: "control",
                reason: "missing or invalid token",
            });
        }
        return match control.as_str() {
            "scripts-ready" => Ok(Inbound::Control(ControlSignal::ScriptsReady)),
            other => Err(BridgeError::MalformedEnvelope(format!(
                "unknown control signal '{other}'"
            ))),
        };
    }

    let name = raw
        .channel
        .ok_or_else(|| BridgeError::MalformedEnvelope("missing channel".into()))?;
    let channel = Channel::parse(&name).ok_or(BridgeError::UnknownChannel(name))?;

    if policy.sandboxed && !channel.available_when_sandboxed() {
        return Err(BridgeError::Rejected {
            channel: channel.as_str(),
            reason: "sandboxed view",
        });
    }
    if channel == Channel::Internal && !token_ok {
        return Err(BridgeError::Rejected {
            channel: channel.as_str(),
            reason: "missing or invalid token",
        });
    }

    let payload = raw
        .payload
        .ok_or_else(|| BridgeError::MalformedEnvelope("missing payload".into()))?;
    Ok(Inbound::Message {
        channel,
        payload: Payload::from(payload),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(sandboxed: bool) -> ChannelPolicy {
        ChannelPolicy {
            sandboxed,
            internal_token: "t0k3n".into(),
        }
    }

    fn message(channel: Channel, payload: &str) -> Inbound {
        Inbound::Message {
            channel,
            payload: Payload::copy_from(payload),
        }
    }

    #[test]
    fn user_message_accepted_when_not_sandboxed() {
        let got = parse_inbound(r#"{"channel":"user","payload":"hi"}"#, &policy(false));
        assert_eq!(got, Ok(message(Channel::User, "hi")));
    }

    #[test]
    fn event_message_accepted_when_sandboxed() {
        let got = parse_inbound(r#"{"channel":"event","payload":"{}"}"#, &policy(true));
        assert_eq!(got, Ok(message(Channel::Event, "{}")));
    }

    #[test]
    fn user_and_internal_rejected_when_sandboxed() {
        for body in [
            r#"{"channel":"user","payload":"x"}"#,
            r#"{"channel":"internal","payload":"x","token":"t0k3n"}"#,
        ] {
            let err = parse_inbound(body, &policy(true)).unwrap_err();
            assert!(matches!(
                err,
                BridgeError::Rejected {
                    reason: "sandboxed view",
                    ..
                }
            ));
        }
    }

    #[test]
    fn internal_requires_matching_token() {
        let forged = parse_inbound(r#"{"channel":"internal","payload":"x"}"#, &policy(false));
        assert!(forged.is_err());

        let wrong = parse_inbound(
            r#"{"channel":"internal","payload":"x","token":"guess"}"#,
            &policy(false),
        );
        assert!(wrong.is_err());

        let ok = parse_inbound(
            r#"{"channel":"internal","payload":"x","token":"t0k3n"}"#,
            &policy(false),
        );
        assert_eq!(ok, Ok(message(Channel::Internal, "x")));
    }

    #[test]
    fn control_signal_needs_token_even_in_sandbox() {
        let ok = parse_inbound(r#"{"control":"scripts-ready","token":"t0k3n"}"#, &policy(true));
        assert_eq!(ok, Ok(Inbound::Control(ControlSignal::ScriptsReady)));

        let forged = parse_inbound(r#"{"control":"scripts-ready"}"#, &policy(true));
        assert!(forged.is_err());
    }

    #[test]
    fn malformed_bodies_are_errors() {
        assert!(matches!(
            parse_inbound("not json", &policy(false)),
            Err(BridgeError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            parse_inbound(r#"{"payload":"x"}"#, &policy(false)),
            Err(BridgeError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            parse_inbound(r#"{"channel":"rpc","payload":"x"}"#, &policy(false)),
            Err(BridgeError::UnknownChannel(_))
        ));
        assert!(matches!(
            parse_inbound(r#"{"channel":"user","payload":42}"#, &policy(false)),
            Err(BridgeError::MalformedEnvelope(_))
        ));
    }
}
