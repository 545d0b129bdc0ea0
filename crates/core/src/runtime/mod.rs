mod monitor;
mod shutdown;

pub use monitor::Monitor;
pub use shutdown::ShutdownGuard;
