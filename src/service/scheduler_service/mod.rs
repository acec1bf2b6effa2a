mod dispatch_scheduler;
mod dispatch_worker;
mod tokio_dispatch_scheduler;

pub use dispatch_scheduler::*;
pub use dispatch_worker::*;
pub use tokio_dispatch_scheduler::*;
