use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    checkout::RegistrationCredentials,
    errors::{CheckoutError, ConfigError},
    render::{DateStyle, DisplayOptions},
    schedule::{AmountPrecision, TimeUnit},
    utils::{app_data_dir, config_file_in, ensure_dir},
};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub display_precision: Option<u8>,
    pub amount_precision: AmountPrecision,
    pub date_style: DateStyle,
    pub default_interval: TimeUnit,
    pub default_interval_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            display_precision: Some(2),
            amount_precision: AmountPrecision::Exact,
            date_style: DateStyle::Long,
            default_interval: TimeUnit::Month,
            default_interval_count: 1,
            api_key: None,
            idempotency_key: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 8] = [
        "currency_symbol",
        "display_precision",
        "amount_precision",
        "date_style",
        "default_interval",
        "default_interval_count",
        "api_key",
        "idempotency_key",
    ];

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            currency_symbol: self.currency_symbol.clone(),
            precision: self.display_precision,
            date_style: self.date_style,
            ..DisplayOptions::default()
        }
    }

    pub fn credentials(&self) -> Result<RegistrationCredentials, CheckoutError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or(CheckoutError::MissingCredential("api_key"))?;
        let idempotency_key = self
            .idempotency_key
            .clone()
            .ok_or(CheckoutError::MissingCredential("idempotency_key"))?;
        Ok(RegistrationCredentials {
            api_key,
            idempotency_key,
        })
    }

    /// Updates one setting from its textual form. `none` clears optional values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            reason,
        };
        match key {
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "display_precision" => {
                self.display_precision = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(value.parse::<u8>().map_err(|err| invalid(format!("{err}")))?)
                }
            }
            "amount_precision" => {
                self.amount_precision = if value.eq_ignore_ascii_case("exact") {
                    AmountPrecision::Exact
                } else {
                    AmountPrecision::MinorUnits(
                        value
                            .parse::<u8>()
                            .map_err(|_| invalid("expected `exact` or a digit count".into()))?,
                    )
                }
            }
            "date_style" => {
                self.date_style = match value.to_ascii_lowercase().as_str() {
                    "long" => DateStyle::Long,
                    "short" => DateStyle::Short,
                    _ => return Err(invalid("expected `long` or `short`".into())),
                }
            }
            "default_interval" => {
                self.default_interval = value
                    .parse::<TimeUnit>()
                    .map_err(|err| invalid(format!("{err}")))?
            }
            "default_interval_count" => {
                let count = value.parse::<u32>().map_err(|err| invalid(format!("{err}")))?;
                if count == 0 {
                    return Err(invalid("must be at least 1".into()));
                }
                self.default_interval_count = count;
            }
            "api_key" => self.api_key = optional(value),
            "idempotency_key" => self.idempotency_key = optional(value),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Textual form of a setting; secrets are masked.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let masked = |value: &Option<String>| match value {
            Some(_) => "********".to_string(),
            None => "none".to_string(),
        };
        Ok(match key {
            "currency_symbol" => self.currency_symbol.clone(),
            "display_precision" => self
                .display_precision
                .map(|digits| digits.to_string())
                .unwrap_or_else(|| "none".into()),
            "amount_precision" => match self.amount_precision {
                AmountPrecision::Exact => "exact".into(),
                AmountPrecision::MinorUnits(digits) => digits.to_string(),
            },
            "date_style" => match self.date_style {
                DateStyle::Long => "long".into(),
                DateStyle::Short => "short".into(),
            },
            "default_interval" => self.default_interval.to_string(),
            "default_interval_count" => self.default_interval_count.to_string(),
            "api_key" => masked(&self.api_key),
            "idempotency_key" => masked(&self.idempotency_key),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value.to_string())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
