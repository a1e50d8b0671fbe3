use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value};
use tracing::debug;

use super::{BrowserId, ProcessMessage, ProcessMessageSender};
use crate::channel::Channel;
use crate::payload::Payload;

/// A freshly created script context that can receive bridge globals.
pub trait ScriptContext {
    /// Install `window[global] = { postMessage }` backed by `poster`.
    fn install_channel(&mut self, global: &'static str, poster: ChannelPoster);
}

/// The native side of one `postMessage` function.
#[derive(Clone)]
pub struct ChannelPoster {
    browser: BrowserId,
    channel: Channel,
    sender: Arc<dyn ProcessMessageSender>,
}

impl ChannelPoster {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Called when script invokes `postMessage`. `argument` is `None` when
    /// the script passed a non-string, which is refused.
    pub fn post(&self, argument: Option<&str>) -> bool {
        let Some(borrowed) = argument else {
            return false;
        };
        let message = ProcessMessage::new(self.channel, Payload::copy_from(borrowed));
        self.sender.send_to_host(self.browser, message);
        true
    }
}

/// Renderer-process half of the bridge.
///
/// Engine callbacks arrive on engine threads, so the per-browser sandbox
/// flags sit behind a mutex that is held only for the lookup.
pub struct ProcessBridge {
    sandbox: Mutex<HashMap<BrowserId, bool>>,
    sender: Arc<dyn ProcessMessageSender>,
}

impl ProcessBridge {
    pub fn new(sender: Arc<dyn ProcessMessageSender>) -> Self {
        Self {
            sandbox: Mutex::new(HashMap::new()),
            sender,
        }
    }

    /// Record the sandbox flag the host attached as `extra_info.sandbox`.
    pub fn on_browser_created(&self, browser: BrowserId, extra_info: Option<&Map<String, Value>>) {
        let Some(sandbox) = extra_info
            .and_then(|info| info.get("sandbox"))
            .and_then(Value::as_bool)
        else {
            return;
        };
        self.flags().insert(browser, sandbox);
        debug!(browser, sandbox, "browser created");
    }

    pub fn on_browser_destroyed(&self, browser: BrowserId) {
        self.flags().remove(&browser);
    }

    /// Unknown browsers are treated as not sandboxed.
    pub fn is_sandboxed(&self, browser: BrowserId) -> bool {
        self.flags().get(&browser).copied().unwrap_or(false)
    }

    pub fn tracked_browsers(&self) -> usize {
        self.flags().len()
    }

    /// Install the bridge globals allowed for `browser` into `context`.
    pub fn on_context_created(&self, browser: BrowserId, context: &mut dyn ScriptContext) {
        let sandboxed = self.is_sandboxed(browser);
        for &channel in Channel::installed(sandboxed) {
            context.install_channel(
                channel.script_global(),
                ChannelPoster {
                    browser,
                    channel,
                    sender: Arc::clone(&self.sender),
                },
            );
        }
        debug!(browser, sandboxed, "bridge installed into script context");
    }

    fn flags(&self) -> std::sync::MutexGuard<'_, HashMap<BrowserId, bool>> {
        self.sandbox.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
