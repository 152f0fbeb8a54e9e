//! Layout engine for timeline (Gantt) charts.
//!
//! Packs overlapping tasks into display rows ([`collision`]), maps task
//! dates to pixel spans and back ([`position`]), and drives move/resize
//! gestures with live re-layout ([`interaction`], [`chart`]). Rendering is
//! left to the host; the engine only produces rows, rectangles and dates.

pub mod chart;
pub mod collision;
pub mod config;
pub mod error;
pub mod interaction;
pub mod io;
pub mod model;
pub mod position;
pub mod range;
pub mod units;

pub use chart::{GanttChart, GanttEvents, GroupLayout, TaskBar};
pub use collision::{detect_overlaps, preview_arrangement, would_collide, RowArrangement};
pub use config::GanttSettings;
pub use error::{GanttError, Result};
pub use interaction::{DragKind, RowController, TaskCommit};
pub use model::{Task, TaskGroup, TimelineWindow, ViewMode};
pub use position::{pixels_to_dates, task_span, task_to_pixels, visible_span, DateSpan, PixelSpan};
