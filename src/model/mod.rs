pub mod task;
pub mod timeline;
pub mod view_mode;

pub use task::{Task, TaskGroup};
pub use timeline::TimelineWindow;
pub use view_mode::{ViewMode, ViewPolicy};
