// Runtime configuration: optional TOML file, then environment overrides.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::interface_adapters::clients::{BodyShape, SheetSchema};
use crate::use_cases::ImageNormalizer;
use crate::use_cases::feedback::DEFAULT_DISPLAY_FOR;
use crate::use_cases::guest_list_sync::DEFAULT_REFRESH_DELAY;

const DEFAULT_CONFIG_FILE: &str = "guest_list.toml";
const DEFAULT_SHEET_API_URL: &str = "http://127.0.0.1:3100/api/v1/guests";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_ip: IpAddr,
    pub http_port: u16,
    pub sheet_api_url: String,
    pub schema: SheetSchema,
    pub sheet_timeout: Option<Duration>,
    pub refresh_delay: Duration,
    pub feedback_display_for: Duration,
    pub max_upload_bytes: usize,
    pub normalizer: ImageNormalizer,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            http_port: 3000,
            sheet_api_url: DEFAULT_SHEET_API_URL.to_string(),
            schema: SheetSchema::default(),
            sheet_timeout: None,
            refresh_delay: DEFAULT_REFRESH_DELAY,
            feedback_display_for: DEFAULT_DISPLAY_FOR,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            normalizer: ImageNormalizer::default(),
        }
    }
}

// Shape of the optional TOML file. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    bind_ip: Option<IpAddr>,
    port: Option<u16>,
    refresh_delay_ms: Option<u64>,
    feedback_ttl_ms: Option<u64>,
    max_upload_bytes: Option<usize>,
    sheet: SheetSection,
    photo: PhotoSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SheetSection {
    api_url: Option<String>,
    name_field: Option<String>,
    status_field: Option<String>,
    photo_field: Option<String>,
    body_shape: Option<BodyShape>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PhotoSection {
    max_side: Option<u32>,
    jpeg_quality: Option<u8>,
}

impl Settings {
    /// Loads `GUEST_LIST_CONFIG` (or `guest_list.toml` when present) and
    /// applies environment overrides on top.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("GUEST_LIST_CONFIG").ok();
        let file = match path.as_deref() {
            Some(path) => Some(read_file(path)?),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Some(read_file(DEFAULT_CONFIG_FILE)?)
            }
            None => None,
        };

        Self::from_sources(file.as_deref(), |key| std::env::var(key).ok())
    }

    pub fn from_sources(
        file: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();
        if let Some(contents) = file {
            let parsed: FileSettings = toml::from_str(contents)?;
            settings.apply_file(parsed);
        }
        settings.apply_env(&env)?;
        settings.validate()?;
        Ok(settings)
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(ip) = file.bind_ip {
            self.bind_ip = ip;
        }
        if let Some(port) = file.port {
            self.http_port = port;
        }
        if let Some(ms) = file.refresh_delay_ms {
            self.refresh_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.feedback_ttl_ms {
            self.feedback_display_for = Duration::from_millis(ms);
        }
        if let Some(bytes) = file.max_upload_bytes {
            self.max_upload_bytes = bytes;
        }

        let sheet = file.sheet;
        if let Some(url) = sheet.api_url {
            self.sheet_api_url = url;
        }
        if let Some(field) = sheet.name_field {
            self.schema.name_field = field;
        }
        if let Some(field) = sheet.status_field {
            self.schema.status_field = field;
        }
        if let Some(field) = sheet.photo_field {
            self.schema.photo_field = field;
        }
        if let Some(shape) = sheet.body_shape {
            self.schema.body_shape = shape;
        }
        if let Some(ms) = sheet.timeout_ms {
            self.sheet_timeout = Some(Duration::from_millis(ms));
        }

        if let Some(side) = file.photo.max_side {
            self.normalizer.max_side = side;
        }
        if let Some(quality) = file.photo.jpeg_quality {
            self.normalizer.quality = quality;
        }
    }

    fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(ip) = parse_env(env, "GUEST_LIST_BIND_IP")? {
            self.bind_ip = ip;
        }
        if let Some(port) = parse_env(env, "GUEST_LIST_PORT")? {
            self.http_port = port;
        }
        if let Some(url) = env("SHEET_API_URL") {
            self.sheet_api_url = url;
        }
        // Field names are taken verbatim; a trailing space is significant.
        if let Some(field) = env("SHEET_NAME_FIELD") {
            self.schema.name_field = field;
        }
        if let Some(field) = env("SHEET_STATUS_FIELD") {
            self.schema.status_field = field;
        }
        if let Some(field) = env("SHEET_PHOTO_FIELD") {
            self.schema.photo_field = field;
        }
        if let Some(raw) = env("SHEET_BODY_SHAPE") {
            self.schema.body_shape = BodyShape::parse(&raw).ok_or(ConfigError::Invalid {
                key: "SHEET_BODY_SHAPE",
                value: raw,
            })?;
        }
        if let Some(ms) = parse_env::<u64>(env, "SHEET_TIMEOUT_MS")? {
            self.sheet_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(ms) = parse_env(env, "REFRESH_DELAY_MS")? {
            self.refresh_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_env(env, "FEEDBACK_TTL_MS")? {
            self.feedback_display_for = Duration::from_millis(ms);
        }
        if let Some(bytes) = parse_env(env, "MAX_UPLOAD_BYTES")? {
            self.max_upload_bytes = bytes;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.schema.name_field.is_empty() {
            return Err(ConfigError::Invalid {
                key: "name_field",
                value: String::new(),
            });
        }
        if self.normalizer.max_side == 0 {
            return Err(ConfigError::Invalid {
                key: "photo.max_side",
                value: "0".to_string(),
            });
        }
        if !(1..=100).contains(&self.normalizer.quality) {
            return Err(ConfigError::Invalid {
                key: "photo.jpeg_quality",
                value: self.normalizer.quality.to_string(),
            });
        }
        Ok(())
    }
}

fn read_file(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })
}

fn parse_env<T: FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(None),
    }
}
