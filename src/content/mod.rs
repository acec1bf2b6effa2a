mod category_registry;
mod content_resolver;
mod translations;

pub use category_registry::*;
pub use content_resolver::*;
pub use translations::*;
