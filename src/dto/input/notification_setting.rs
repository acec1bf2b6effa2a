use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NotificationSetting {
    #[serde(default)]
    pub showtime: bool,
    /// Absent means "use the engine wide default".
    #[serde(default)]
    pub accept_email: Option<bool>,
}
