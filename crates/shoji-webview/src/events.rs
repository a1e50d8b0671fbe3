//! Events queued by engine callbacks for the UI loop to process.

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded.
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Work a view cannot do from inside the engine callback that noticed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The bootstrap script of a new document asked for injected scripts.
    ScriptsRequested,
    PageLoad { state: PageLoadState, url: String },
    TitleChanged { title: String },
}
