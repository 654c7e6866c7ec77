//! # Adapter Implementations
//!
//! - `ports`: the remote dispatch seam processors talk to
//! - `remote`: the logging implementation shipped with the runtime

pub mod ports;
pub mod remote;

pub use ports::*;
pub use remote::LoggingRemoteDispatcher;
