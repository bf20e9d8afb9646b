//! Persisted conversion adjustments.
//!
//! The adjustments live under a single key in a small key-value store.  On
//! disk, each key is a JSON file in the platform-specific configuration
//! directory (e.g., `~/.config/hijripick/` on Linux) unless another directory
//! is given on the command line.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Key under which the adjustments are stored
pub(crate) const ADJUSTMENTS_KEY: &str = "dateAdjustSettings";

const APP_QUALIFIER: &str = "";
const APP_ORG: &str = "";
const APP_NAME: &str = "hijripick";

/// Length of every month of the approximated Hijri calendar
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub(crate) enum MonthLength {
    TwentyNine,
    #[default]
    Thirty,
}

impl MonthLength {
    pub(crate) fn days(self) -> u8 {
        match self {
            MonthLength::TwentyNine => 29,
            MonthLength::Thirty => 30,
        }
    }

    pub(crate) fn toggled(self) -> MonthLength {
        match self {
            MonthLength::TwentyNine => MonthLength::Thirty,
            MonthLength::Thirty => MonthLength::TwentyNine,
        }
    }
}

impl TryFrom<u8> for MonthLength {
    type Error = InvalidMonthLength;

    fn try_from(days: u8) -> Result<MonthLength, InvalidMonthLength> {
        match days {
            29 => Ok(MonthLength::TwentyNine),
            30 => Ok(MonthLength::Thirty),
            _ => Err(InvalidMonthLength(days)),
        }
    }
}

impl From<MonthLength> for u8 {
    fn from(length: MonthLength) -> u8 {
        length.days()
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("month length must be 29 or 30, not {0}")]
pub(crate) struct InvalidMonthLength(u8);

/// User corrections applied to every conversion
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Adjustments {
    pub(crate) day_offset: i32,
    pub(crate) month_length: MonthLength,
}

impl Adjustments {
    /// Parses stored adjustments.  Each field is taken independently: a
    /// missing or malformed field keeps its default, and input that is not
    /// JSON at all yields the defaults.
    pub(crate) fn from_json(s: &str) -> Adjustments {
        let mut adjustments = Adjustments::default();
        let value = match serde_json::from_str::<Value>(s) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to parse stored adjustments: {e}, using defaults");
                return adjustments;
            }
        };
        if let Some(day_offset) = field(&value, "dayOffset") {
            adjustments.day_offset = day_offset;
        }
        if let Some(month_length) = field(&value, "monthLength") {
            adjustments.month_length = month_length;
        }
        adjustments
    }

    pub(crate) fn to_json(self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self)
    }
}

fn field<T: DeserializeOwned>(value: &Value, key: &str) -> Option<T> {
    T::deserialize(value.get(key)?).ok()
}

/// A string key-value store
pub(crate) trait SettingsStore: fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Stores each key as a `{key}.json` file in a directory
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub(crate) fn new(dir: PathBuf) -> FileStore {
        FileStore { dir }
    }

    /// Returns `None` if the platform-specific directory cannot be determined
    pub(crate) fn default_location() -> Option<FileStore> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
            .map(|dirs| FileStore::new(dirs.config_dir().to_path_buf()))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No stored settings at {}", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", path.display());
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)
    }
}

/// Keeps values in memory for the life of the process
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStore(HashMap<String, String>);

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The current adjustments together with the store they persist to.
/// [`AdjustmentSettings::apply()`] is the only way to change them.
#[derive(Debug)]
pub(crate) struct AdjustmentSettings {
    current: Adjustments,
    store: Box<dyn SettingsStore>,
}

impl AdjustmentSettings {
    pub(crate) fn load(store: Box<dyn SettingsStore>) -> AdjustmentSettings {
        let current = store
            .get(ADJUSTMENTS_KEY)
            .map(|s| Adjustments::from_json(&s))
            .unwrap_or_default();
        tracing::info!(
            day_offset = current.day_offset,
            month_length = current.month_length.days(),
            "Loaded adjustments"
        );
        AdjustmentSettings { current, store }
    }

    pub(crate) fn current(&self) -> Adjustments {
        self.current
    }

    /// Replaces the adjustments and writes them to the store.  A failed write
    /// is logged; the new adjustments take effect regardless.
    pub(crate) fn apply(&mut self, adjustments: Adjustments) {
        self.current = adjustments;
        tracing::info!(
            day_offset = adjustments.day_offset,
            month_length = adjustments.month_length.days(),
            "Applying adjustments"
        );
        let result = adjustments
            .to_json()
            .map_err(io::Error::from)
            .and_then(|json| self.store.set(ADJUSTMENTS_KEY, &json));
        if let Err(e) = result {
            tracing::warn!("Failed to save adjustments: {e}");
        }
    }
}
