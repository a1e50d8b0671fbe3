//! Renderer subprocess driven by line-delimited JSON on stdin.
//!
//! The embedding engine reports browser and script-context lifecycle as
//! [`EngineCommand`]s; `postMessage` calls made by page script arrive as
//! `invoke`. Messages bound for the host are written to stdout as
//! `{"browser":..,"name":..,"argument":..}` lines.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shoji_bridge::process::{
    subprocess_role, BrowserId, ChannelPoster, ProcessBridge, ProcessMessage,
    ProcessMessageSender, ScriptContext, SubprocessEngine,
};
use tracing::{debug, info, warn};

/// Subprocess role served by this helper.
pub const RENDERER_ROLE: &str = "renderer";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum EngineCommand {
    #[serde(rename_all = "camelCase")]
    BrowserCreated {
        browser: BrowserId,
        #[serde(default)]
        extra_info: Option<Map<String, Value>>,
    },
    BrowserDestroyed { browser: BrowserId },
    ContextCreated { browser: BrowserId },
    /// Script called `window[global].postMessage(argument)`; a non-string
    /// argument arrives as `null`.
    Invoke {
        browser: BrowserId,
        global: String,
        #[serde(default)]
        argument: Option<Value>,
    },
}

#[derive(Debug, Serialize)]
struct OutboundLine<'a> {
    browser: BrowserId,
    name: &'a str,
    argument: &'a str,
}

/// Writes host-bound messages as JSON lines.
pub struct LineSender<W> {
    out: Mutex<W>,
}

impl<W: Write> LineSender<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> ProcessMessageSender for LineSender<W> {
    fn send_to_host(&self, browser: BrowserId, message: ProcessMessage) {
        let line = OutboundLine {
            browser,
            name: &message.name,
            argument: &message.argument,
        };
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = write_line(&mut *out, &line) {
            warn!(browser, error = %e, "could not forward message to host");
        }
    }
}

fn write_line<W: Write>(out: &mut W, line: &OutboundLine<'_>) -> io::Result<()> {
    serde_json::to_writer(&mut *out, line)?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Bridge globals installed into one script context.
#[derive(Default)]
struct InstalledGlobals {
    posters: HashMap<&'static str, ChannelPoster>,
}

impl ScriptContext for InstalledGlobals {
    fn install_channel(&mut self, global: &'static str, poster: ChannelPoster) {
        self.posters.insert(global, poster);
    }
}

/// Renderer state: the process bridge plus the globals of each browser's
/// current script context.
pub struct Renderer {
    bridge: ProcessBridge,
    contexts: HashMap<BrowserId, InstalledGlobals>,
}

impl Renderer {
    pub fn new(sender: Arc<dyn ProcessMessageSender>) -> Self {
        Self {
            bridge: ProcessBridge::new(sender),
            contexts: HashMap::new(),
        }
    }

    pub fn apply(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::BrowserCreated { browser, extra_info } => {
                self.bridge.on_browser_created(browser, extra_info.as_ref());
            }
            EngineCommand::BrowserDestroyed { browser } => {
                self.bridge.on_browser_destroyed(browser);
                self.contexts.remove(&browser);
            }
            EngineCommand::ContextCreated { browser } => {
                let mut globals = InstalledGlobals::default();
                self.bridge.on_context_created(browser, &mut globals);
                self.contexts.insert(browser, globals);
            }
            EngineCommand::Invoke {
                browser,
                global,
                argument,
            } => {
                let poster = self
                    .contexts
                    .get(&browser)
                    .and_then(|ctx| ctx.posters.get(global.as_str()));
                let Some(poster) = poster else {
                    debug!(browser, %global, "postMessage on a global that is not installed");
                    return;
                };
                let text = argument.as_ref().and_then(Value::as_str);
                if !poster.post(text) {
                    warn!(browser, %global, "postMessage argument must be a string");
                }
            }
        }
    }

    /// Process commands until `input` ends. Malformed lines are skipped.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<EngineCommand>(line) {
                Ok(command) => self.apply(command),
                Err(e) => warn!(error = %e, "malformed engine command"),
            }
        }
        let open = self.bridge.tracked_browsers();
        if open > 0 {
            debug!(browsers = open, "input ended with browsers still open");
        }
        Ok(())
    }
}

/// Engine that runs the renderer role over stdin/stdout.
pub struct StdioEngine;

impl SubprocessEngine for StdioEngine {
    fn execute_process(&mut self, args: &[String]) -> i32 {
        match subprocess_role(args) {
            Some(RENDERER_ROLE) => {
                info!("renderer subprocess started");
                let sender = Arc::new(LineSender::new(io::stdout()));
                let mut renderer = Renderer::new(sender);
                match renderer.run(io::stdin().lock()) {
                    Ok(()) => 0,
                    Err(e) => {
                        warn!(error = %e, "renderer input failed");
                        1
                    }
                }
            }
            other => {
                debug!(role = ?other, "not a renderer subprocess");
                -1
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
