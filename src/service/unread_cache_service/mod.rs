mod counter_store;
mod unread_cache_service;
mod unread_cache_service_impl;

pub use counter_store::*;
pub use unread_cache_service::*;
pub use unread_cache_service_impl::*;
