pub mod geometry;
mod path;
mod projection;
mod view;

pub use path::{Path, PathGenerator, Ring};
pub use projection::Viewport;
pub(crate) use view::MapState;
pub use view::{MapView, MoveEndListener, Subscription};
