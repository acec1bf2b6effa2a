mod notification;
mod notification_id;
mod notification_setting;
mod unread_count_details;

pub use notification::*;
pub use notification_id::*;
pub use notification_setting::*;
pub use unread_count_details::*;
