use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical bridge channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Event,
    User,
    Internal,
}

const ALL: [Channel; 3] = [Channel::Event, Channel::User, Channel::Internal];
const SANDBOXED: [Channel; 1] = [Channel::Event];

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Event => "event",
            Channel::User => "user",
            Channel::Internal => "internal",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "event" => Some(Channel::Event),
            "user" => Some(Channel::User),
            "internal" => Some(Channel::Internal),
            _ => None,
        }
    }

    /// Name of the cross-process message that carries this channel.
    pub fn process_message_name(self) -> &'static str {
        match self {
            Channel::Event => "EventBridgeMessage",
            Channel::User => "UserBridgeMessage",
            Channel::Internal => "internalMessage",
        }
    }

    pub fn from_process_message_name(name: &str) -> Option<Self> {
        ALL.into_iter().find(|c| c.process_message_name() == name)
    }

    /// Global object that exposes `postMessage` for this channel.
    pub fn script_global(self) -> &'static str {
        match self {
            Channel::Event => "__shojiEventBridge",
            Channel::User => "__shojiUserBridge",
            Channel::Internal => "__shojiInternalBridge",
        }
    }

    pub fn available_when_sandboxed(self) -> bool {
        self == Channel::Event
    }

    /// Channels installed into a script context.
    pub fn installed(sandboxed: bool) -> &'static [Channel] {
        if sandboxed {
            &SANDBOXED
        } else {
            &ALL
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandboxed_views_only_get_event_channel() {
        assert_eq!(Channel::installed(true), &[Channel::Event]);
        assert_eq!(
            Channel::installed(false),
            &[Channel::Event, Channel::User, Channel::Internal]
        );
    }

    #[test]
    fn process_message_names_round_trip() {
        for c in ALL {
            assert_eq!(
                Channel::from_process_message_name(c.process_message_name()),
                Some(c)
            );
        }
        assert_eq!(Channel::from_process_message_name("Bogus"), None);
    }

    #[test]
    fn parse_rejects_unknown_and_case_variants() {
        assert_eq!(Channel::parse("user"), Some(Channel::User));
        assert_eq!(Channel::parse("User"), None);
        assert_eq!(Channel::parse(""), None);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Channel::Internal).unwrap(), "\"internal\"");
    }
}
