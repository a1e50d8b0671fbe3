pub mod errors;
pub mod id;
pub mod types;

pub use errors::{
    BridgeError, ConfigError, DispatchError, MenuError, PlatformError, ShellError, ViewError,
};
pub use id::{new_id, new_token, IdAllocator, MenuItemId, TrayId, ViewId, WindowId};
pub use types::{Point, Rect, Size};

pub type Result<T> = std::result::Result<T, ShellError>;
