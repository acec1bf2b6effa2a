mod settings_service;
mod settings_service_impl;

pub use settings_service::*;
pub use settings_service_impl::*;
