mod notification;
mod notification_setting;

pub use notification::*;
pub use notification_setting::*;
