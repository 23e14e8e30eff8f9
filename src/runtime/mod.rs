//! Host runtime: page, virtual-clock scheduler, real-time driver.

pub mod driver;
pub mod page;
pub mod scheduler;

pub use driver::{run_for, run_until_idle};
pub use page::{Page, WindowSize};
pub use scheduler::{Scheduler, TimerId, FRAME_INTERVAL_MS};
