use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use remindo_models::settings::Settings;

type SettingsBuilder = config::ConfigBuilder<DefaultState>;

fn with_defaults() -> Result<SettingsBuilder, ConfigError> {
    Config::builder()
        .set_default("storage.path", "remindo.json")?
        .set_default("scanner.interval_secs", 60)?
        .set_default("scanner.tolerance_secs", 300)?
        .set_default("scanner.deduplicate", false)?
        .set_default("scanner.monthly_wrap", "calendar")
}

pub fn load() -> Result<Settings, ConfigError> {
    let settings = with_defaults()?
        .add_source(File::with_name("appsettings").required(false))
        .add_source(File::with_name("appsettings.local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    validate(settings.try_deserialize()?)
}

fn validate(settings: Settings) -> Result<Settings, ConfigError> {
    if settings.scanner.interval_secs == 0 {
        return Err(ConfigError::Message(
            "scanner.interval_secs must be at least 1".to_owned(),
        ));
    }

    Ok(settings)
}
