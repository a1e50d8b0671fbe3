//! JS ↔ host messaging for embedded views.
//!
//! Three channels carry strings from a view's script context to the host:
//!
//! - **event**: one-way notifications, installed in every view
//! - **user**: user-defined RPC, absent from sandboxed views
//! - **internal**: host control traffic, absent from sandboxed views and
//!   authenticated with a per-view token so page code cannot forge it
//!
//! [`script`] generates the JS side, [`envelope`] validates what comes
//! back, [`navigation`] decides whether a view may navigate, and
//! [`process`] carries the same contract across a multi-process engine.

pub mod channel;
pub mod envelope;
pub mod handlers;
pub mod navigation;
pub mod notification;
pub mod payload;
pub mod process;
pub mod script;

pub use channel::Channel;
pub use envelope::{parse_inbound, ChannelPolicy, ControlSignal, Inbound};
pub use handlers::{MessageCallback, NavigationCallback, ViewCallbacks};
pub use navigation::{glob_match, NavigationRules};
pub use notification::EventNotification;
pub use payload::Payload;
pub use script::{bootstrap_script, js_deliver, ScriptSet};
