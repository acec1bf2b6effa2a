mod notification;
mod sending;
mod setting;
mod unread_rollup;

pub use notification::*;
pub use sending::*;
pub use setting::*;
pub use unread_rollup::*;
