mod notification_find_entity;
mod notification_insert_entity;
mod setting_find_entity;

pub use notification_find_entity::*;
pub use notification_insert_entity::*;
pub use setting_find_entity::*;
