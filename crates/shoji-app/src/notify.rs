//! Outbound notifications to the control process.

use std::sync::Arc;

use shoji_bridge::{Channel, MessageCallback, Payload, ViewCallbacks};
use shoji_common::ViewId;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::control::protocol::Notification;

/// Cloneable handle that queues notifications for the stdout writer.
/// Without a control process notifications are only logged.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<Notification>>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn send(&self, notification: Notification) {
        match &self.tx {
            Some(tx) => {
                trace!(?notification, "notification queued");
                if tx.send(notification).is_err() {
                    debug!("control writer gone; notification dropped");
                }
            }
            None => debug!(?notification, "notification (no control process)"),
        }
    }

    fn forwarder(&self, channel: Channel) -> MessageCallback {
        let notifier = self.clone();
        Arc::new(move |view_id: ViewId, payload: Payload| {
            notifier.send(Notification::BridgeMessage {
                view_id,
                channel,
                payload: payload.into_string(),
            });
        })
    }

    /// Callbacks that forward every bridge channel of a view. Navigation is
    /// decided by the view's rules alone; the control process learns of it
    /// through `willNavigate` on the event channel.
    pub fn view_callbacks(&self) -> ViewCallbacks {
        ViewCallbacks {
            navigation: None,
            event: Some(self.forwarder(Channel::Event)),
            user: Some(self.forwarder(Channel::User)),
            internal: Some(self.forwarder(Channel::Internal)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_callbacks_forward_each_channel() {
        let (notifier, mut rx) = Notifier::channel();
        let callbacks = notifier.view_callbacks();
        callbacks.deliver(ViewId(2), Channel::User, Payload::from("hello".to_string()));
        callbacks.deliver(ViewId(2), Channel::Internal, Payload::from("x".to_string()));

        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::BridgeMessage {
                view_id: ViewId(2),
                channel: Channel::User,
                payload: "hello".into()
            }
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            Notification::BridgeMessage {
                channel: Channel::Internal,
                ..
            }
        ));
    }

    #[test]
    fn disconnected_notifier_drops_silently() {
        Notifier::disconnected().send(Notification::WindowClosed {
            window_id: shoji_common::WindowId(1),
        });
    }
}
