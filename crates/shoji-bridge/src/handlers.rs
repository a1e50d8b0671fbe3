//! Host-side callbacks bound to one view.

use std::sync::Arc;

use shoji_common::ViewId;
use tracing::{debug, warn};

use crate::channel::Channel;
use crate::envelope::{parse_inbound, ChannelPolicy, ControlSignal, Inbound};
use crate::navigation::NavigationRules;
use crate::payload::Payload;

/// Receives a message posted on one channel. The payload is owned by the
/// callback from the moment it is called.
pub type MessageCallback = Arc<dyn Fn(ViewId, Payload) + Send + Sync>;

/// Decides whether a view may navigate to a URL; `false` blocks.
pub type NavigationCallback = Arc<dyn Fn(ViewId, &str) -> bool + Send + Sync>;

/// Callbacks supplied with a view creation request. Rebound whenever the
/// view is constructed.
#[derive(Clone, Default)]
pub struct ViewCallbacks {
    pub navigation: Option<NavigationCallback>,
    pub event: Option<MessageCallback>,
    pub user: Option<MessageCallback>,
    pub internal: Option<MessageCallback>,
}

impl ViewCallbacks {
    pub fn for_channel(&self, channel: Channel) -> Option<&MessageCallback> {
        match channel {
            Channel::Event => self.event.as_ref(),
            Channel::User => self.user.as_ref(),
            Channel::Internal => self.internal.as_ref(),
        }
    }

    /// Hand `payload` to the channel's callback. Returns whether one was bound.
    pub fn deliver(&self, view: ViewId, channel: Channel, payload: Payload) -> bool {
        match self.for_channel(channel) {
            Some(cb) => {
                cb(view, payload);
                true
            }
            None => {
                debug!(view_id = view.0, %channel, "no handler bound; message dropped");
                false
            }
        }
    }

    /// Both the view's rules and the host callback must allow.
    pub fn decide_navigation(&self, view: ViewId, rules: &NavigationRules, url: &str) -> bool {
        if !rules.allows(url) {
            debug!(view_id = view.0, url = %url, "navigation blocked by rules");
            return false;
        }
        self.navigation.as_ref().map_or(true, |cb| cb(view, url))
    }
}

impl std::fmt::Debug for ViewCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCallbacks")
            .field("navigation", &self.navigation.is_some())
            .field("event", &self.event.is_some())
            .field("user", &self.user.is_some())
            .field("internal", &self.internal.is_some())
            .finish()
    }
}

/// Validate a raw IPC body and deliver it.
///
/// Returns the control signal, if the body was one, for the caller to act
/// on. Rejected bodies are logged and dropped.
pub fn route_ipc_body(
    view: ViewId,
    body: &str,
    policy: &ChannelPolicy,
    callbacks: &ViewCallbacks,
) -> Option<ControlSignal> {
    match parse_inbound(body, policy) {
        Ok(Inbound::Message { channel, payload }) => {
            debug!(view_id = view.0, %channel, body_len = payload.len(), "bridge message");
            callbacks.deliver(view, channel, payload);
            None
        }
        Ok(Inbound::Control(signal)) => Some(signal),
        Err(e) => {
            warn!(view_id = view.0, body_len = body.len(), error = %e, "bridge message rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<(ViewId, String)>>>;

    fn recorder(log: &Log) -> MessageCallback {
        let log = Arc::clone(log);
        Arc::new(move |view: ViewId, payload: Payload| {
            log.lock().unwrap().push((view, payload.into_string()));
        })
    }

    fn policy() -> ChannelPolicy {
        ChannelPolicy {
            sandboxed: false,
            internal_token: "tok".into(),
        }
    }

    #[test]
    fn route_delivers_to_matching_channel_only() {
        let user: Log = Arc::default();
        let internal: Log = Arc::default();
        let callbacks = ViewCallbacks {
            user: Some(recorder(&user)),
            internal: Some(recorder(&internal)),
            ..Default::default()
        };

        let signal = route_ipc_body(
            ViewId(4),
            r#"{"channel":"user","payload":"ping"}"#,
            &policy(),
            &callbacks,
        );

        assert!(signal.is_none());
        assert_eq!(*user.lock().unwrap(), vec![(ViewId(4), "ping".to_string())]);
        assert!(internal.lock().unwrap().is_empty());
    }

    #[test]
    fn route_drops_forged_internal_message() {
        let internal: Log = Arc::default();
        let callbacks = ViewCallbacks {
            internal: Some(recorder(&internal)),
            ..Default::default()
        };
        route_ipc_body(
            ViewId(1),
            r#"{"channel":"internal","payload":"quit"}"#,
            &policy(),
            &callbacks,
        );
        assert!(internal.lock().unwrap().is_empty());
    }

    #[test]
    fn sandboxed_view_reaches_event_channel_only() {
        let event: Log = Arc::default();
        let user: Log = Arc::default();
        let internal: Log = Arc::default();
        let callbacks = ViewCallbacks {
            event: Some(recorder(&event)),
            user: Some(recorder(&user)),
            internal: Some(recorder(&internal)),
            ..Default::default()
        };
        let sandboxed = ChannelPolicy {
            sandboxed: true,
            internal_token: "tok".into(),
        };

        for body in [
            r#"{"channel":"user","payload":"u"}"#,
            r#"{"channel":"internal","payload":"i","token":"tok"}"#,
            r#"{"channel":"event","payload":"e"}"#,
        ] {
            assert!(route_ipc_body(ViewId(6), body, &sandboxed, &callbacks).is_none());
        }

        assert_eq!(*event.lock().unwrap(), vec![(ViewId(6), "e".to_string())]);
        assert!(user.lock().unwrap().is_empty());
        assert!(internal.lock().unwrap().is_empty());
    }

    #[test]
    fn route_returns_control_signal() {
        let signal = route_ipc_body(
            ViewId(1),
            r#"{"control":"scripts-ready","token":"tok"}"#,
            &policy(),
            &ViewCallbacks::default(),
        );
        assert_eq!(signal, Some(ControlSignal::ScriptsReady));
    }

    #[test]
    fn deliver_without_handler_reports_false() {
        let callbacks = ViewCallbacks::default();
        assert!(!callbacks.deliver(ViewId(1), Channel::Event, Payload::copy_from("x")));
    }

    #[test]
    fn navigation_needs_rules_and_callback() {
        let rules = NavigationRules::new(["^*.blocked.test*"]);
        let callbacks = ViewCallbacks {
            navigation: Some(Arc::new(|_: ViewId, url: &str| !url.contains("deny"))),
            ..Default::default()
        };
        assert!(callbacks.decide_navigation(ViewId(1), &rules, "https://ok.test/"));
        assert!(!callbacks.decide_navigation(ViewId(1), &rules, "https://ok.test/deny"));
        assert!(!callbacks.decide_navigation(ViewId(1), &rules, "https://www.blocked.test/"));
    }

    #[test]
    fn navigation_without_callback_follows_rules() {
        let callbacks = ViewCallbacks::default();
        assert!(callbacks.decide_navigation(ViewId(1), &NavigationRules::default(), "x://y"));
    }
}
