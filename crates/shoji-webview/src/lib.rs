//! Embedded views and the per-window compositor.
//!
//! - [`View`]: the operations every rendering surface supports, one
//!   implementation per engine ([`WryView`] for the system webview)
//! - [`Compositor`]: owns a window's views in two tiers; full-size views
//!   follow the window size, overlay views keep explicit coordinates
//! - [`mask`]: mask descriptors and pointer hit-testing helpers

pub mod compositor;
pub mod events;
pub mod history;
pub mod mask;
pub mod view;
pub mod wry_view;

pub use compositor::{Compositor, ResizeDebounce, Tier};
pub use events::{PageLoadState, ViewEvent};
pub use history::NavigationHistory;
pub use view::{create_view, Partition, Renderer, View, ViewOptions, ViewState};
pub use wry_view::WryView;
