use remindo_models::reminder::{InvalidReminderTime, Reminder, ReminderFireTime, ReminderId, ReminderRepeat};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct ReminderStorageModel {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ReminderId,
    pub text: String,
    pub time: String,
    #[serde(default)]
    pub repeat: String,
    #[serde(default, deserialize_with = "deserialize_day_numbers")]
    pub weekdays: Vec<u8>,
    #[serde(default, deserialize_with = "deserialize_day_numbers")]
    pub dates: Vec<u8>,
    #[serde(default)]
    pub done: bool,
}

/// Ids written by older versions are short random strings rather than
/// UUIDs. They map to a name-based UUID so the same record keeps the same id
/// on every load.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ReminderId, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
        return Err(D::Error::custom("empty reminder id"));
    }

    Ok(Uuid::parse_str(&raw).unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, raw.as_bytes())))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DayNumber {
    Number(u8),
    Text(String),
}

/// Accepts `[1, 3]` as well as the older `["1", "3"]`.
fn deserialize_day_numbers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    Vec::<DayNumber>::deserialize(deserializer)?
        .into_iter()
        .map(|day| match day {
            DayNumber::Number(n) => Ok(n),
            DayNumber::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid day number {s:?}"))),
        })
        .collect()
}

impl From<Reminder> for ReminderStorageModel {
    fn from(value: Reminder) -> Self {
        Self {
            id: value.id,
            text: value.text,
            time: value.fire_at.into_string(),
            repeat: value.repeat.as_str().to_owned(),
            weekdays: value.weekdays.into_iter().collect(),
            dates: value.dates.into_iter().collect(),
            done: value.done,
        }
    }
}

impl TryFrom<ReminderStorageModel> for Reminder {
    type Error = InvalidReminderTime;

    fn try_from(value: ReminderStorageModel) -> Result<Self, Self::Error> {
        let fire_at: ReminderFireTime = value.time.parse()?;

        Ok(Self {
            id: value.id,
            text: value.text,
            fire_at,
            repeat: ReminderRepeat::from(value.repeat.as_str()),
            weekdays: value.weekdays.into_iter().collect(),
            dates: value.dates.into_iter().collect(),
            done: value.done,
        })
    }
}
