use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct TelegramSettings {
    pub token: String,
    pub chat_id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StorageSettings {
    pub path: String,
}

/// How a monthly reminder with explicit dates wraps past the end of the month.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MonthlyWrap {
    /// Step through real calendar months.
    #[default]
    Calendar,
    /// Push a passed date forward by a flat 31 days.
    Flat31,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ScannerSettings {
    pub interval_secs: u64,
    pub tolerance_secs: u64,
    pub deduplicate: bool,
    pub monthly_wrap: MonthlyWrap,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub storage: StorageSettings,
    pub scanner: ScannerSettings,
    pub telegram: Option<TelegramSettings>,
}
