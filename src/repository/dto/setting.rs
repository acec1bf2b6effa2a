/// Per receiver notification preferences.
///
/// `accept_email` is tri-state: an unset value falls back to the
/// engine wide default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingRecord {
    pub showtime: bool,
    pub accept_email: Option<bool>,
}
