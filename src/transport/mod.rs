//!
//! Traits over the external delivery gateways (realtime broadcast,
//! mailing system, push gateway). Deployments plug their gateway
//! clients in here; the logging implementations stand in until then.
//!

mod email;
mod error;
mod push;
mod realtime;

pub use email::*;
pub use error::*;
pub use push::*;
pub use realtime::*;
