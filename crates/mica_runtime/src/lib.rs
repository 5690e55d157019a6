//! Mica runtime: main-thread dispatch and the per-frame scheduler that
//! ties `mica_core`'s layer/view tree, `mica_animation`/`mica_scroll`'s
//! physics, and `mica_platform`'s host contracts into a single cooperative
//! loop (spec.md §4.10, §5).

pub mod attributes;
pub mod error;
pub mod layout;
pub mod main_thread;
pub mod scheduler;

pub use attributes::AttributeTable;
pub use error::RuntimeError;
pub use layout::{LayoutSolver, NoopLayoutSolver};
pub use main_thread::{current_thread_is_main_thread, MainThreadHandle, MainThreadManager};
pub use scheduler::FrameScheduler;
