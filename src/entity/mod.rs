mod entity_ref;
mod entity_registry;
mod entity_source;
mod error;

pub use entity_ref::*;
pub use entity_registry::*;
pub use entity_source::*;
pub use error::*;
