mod delivery_channel;
mod delivery_service;
mod delivery_service_impl;
mod email_channel;
mod push_channel;
mod websocket_channel;

pub use delivery_channel::*;
pub use delivery_service::*;
pub use delivery_service_impl::*;
pub use email_channel::*;
pub use push_channel::*;
pub use websocket_channel::*;
