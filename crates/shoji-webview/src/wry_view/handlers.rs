use std::sync::{Arc, Mutex};

use shoji_bridge::handlers::route_ipc_body;
use shoji_bridge::{Channel, ChannelPolicy, ControlSignal, EventNotification, NavigationRules, ViewCallbacks};
use shoji_common::ViewId;
use tracing::debug;
use wry::WebViewBuilder;

use crate::events::{PageLoadState, ViewEvent};

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

pub(super) type EventSink = Arc<Mutex<Vec<ViewEvent>>>;

fn push(sink: &EventSink, event: ViewEvent) {
    if let Ok(mut events) = sink.lock() {
        events.push(event);
    }
}

/// Bridge messages go straight to the view's callbacks; the bootstrap's
/// scripts-ready signal is queued for the UI loop.
pub(super) fn attach_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    view: ViewId,
    policy: ChannelPolicy,
    callbacks: ViewCallbacks,
    sink: EventSink,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let body = request.body();
        if let Some(ControlSignal::ScriptsReady) = route_ipc_body(view, body, &policy, &callbacks)
        {
            push(&sink, ViewEvent::ScriptsRequested);
        }
    })
}

pub(super) fn attach_navigation_handler<'a>(
    builder: WebViewBuilder<'a>,
    view: ViewId,
    rules: NavigationRules,
    callbacks: ViewCallbacks,
) -> WebViewBuilder<'a> {
    builder.with_navigation_handler(move |url| {
        let allowed = callbacks.decide_navigation(view, &rules, &url);
        debug!(view_id = view.0, url = %url, allowed, "navigation requested");
        let note = EventNotification::WillNavigate { url, allowed };
        callbacks.deliver(view, Channel::Event, note.to_payload());
        allowed
    })
}

pub(super) fn attach_page_load_handler<'a>(
    builder: WebViewBuilder<'a>,
    view: ViewId,
    sink: EventSink,
) -> WebViewBuilder<'a> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(view_id = view.0, ?state, url = %url, "page load");
        push(&sink, ViewEvent::PageLoad { state, url });
    })
}

pub(super) fn attach_title_handler<'a>(
    builder: WebViewBuilder<'a>,
    view: ViewId,
    sink: EventSink,
) -> WebViewBuilder<'a> {
    builder.with_document_title_changed_handler(move |title| {
        debug!(view_id = view.0, title = %title, "title changed");
        push(&sink, ViewEvent::TitleChanged { title });
    })
}
