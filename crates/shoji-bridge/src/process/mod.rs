//! Bridge transport for multi-process rendering engines.
//!
//! In such engines page scripts run in a renderer subprocess. The
//! [`renderer`] side installs the bridge globals into each new script
//! context and turns `postMessage` calls into named process messages; the
//! [`host`] side maps the originating browser back to a view.

pub mod host;
pub mod renderer;
pub mod subprocess;

pub use host::HostRouter;
pub use renderer::{ChannelPoster, ProcessBridge, ScriptContext};
pub use subprocess::{run_subprocess, subprocess_role, HelperError, SubprocessEngine};

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::payload::Payload;

/// Engine-assigned browser identifier.
pub type BrowserId = i32;

/// A named message with one string argument, as carried by the engine's
/// inter-process facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMessage {
    pub name: String,
    pub argument: String,
}

impl ProcessMessage {
    pub fn new(channel: Channel, payload: Payload) -> Self {
        Self {
            name: channel.process_message_name().to_string(),
            argument: payload.into_string(),
        }
    }

    pub fn channel(&self) -> Option<Channel> {
        Channel::from_process_message_name(&self.name)
    }
}

/// Sends a message from a renderer subprocess to the host process.
pub trait ProcessMessageSender: Send + Sync {
    fn send_to_host(&self, browser: BrowserId, message: ProcessMessage);
}
