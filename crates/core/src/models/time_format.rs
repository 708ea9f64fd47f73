//! Serde helpers that render `NaiveTime` as `"HH:MM"`, the format the booking
//! clients send and expect. Deserialization also accepts `"HH:MM:SS"`.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%H:%M";

pub fn format(time: NaiveTime) -> String {
    time.format(FORMAT).to_string()
}

pub fn parse(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(*time))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse(&value).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid time `{value}`, expected HH:MM"))
    })
}

pub mod option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => serializer.serialize_some(&super::format(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|value| {
                super::parse(&value).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid time `{value}`, expected HH:MM"))
                })
            })
            .transpose()
    }
}
