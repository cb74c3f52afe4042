use crate::structs::sheets::Rgb;
use chrono_tz::Tz;
use std::env::var;
use std::str::FromStr;

pub const DEFAULT_TARGET_COLOR: Rgb = Rgb {
    red: 0.851,
    green: 0.886,
    blue: 0.953,
};
pub const DEFAULT_TOLERANCE: f64 = 0.1;
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4000;

/// 啟動時從環境變數讀取一次，之後只讀
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: String,
    pub spreadsheet_id: Option<String>,
    pub sheet_name: String,
    pub target_color: Rgb,
    pub tolerance: f64,
    pub destinations: Vec<Destination>,
    pub timezone: Tz,
    pub max_message_length: usize,
    pub card_replies: bool,
    pub templates_path: Option<String>,
    pub google_access_token: Option<String>,
    pub google_credentials_path: Option<String>,
}

/// 可發佈訊息的 Google Chat space
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub name: String,
    pub space: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: "8080".to_string(),
            spreadsheet_id: None,
            sheet_name: "Planning".to_string(),
            target_color: DEFAULT_TARGET_COLOR,
            tolerance: DEFAULT_TOLERANCE,
            destinations: Vec::new(),
            timezone: chrono_tz::Europe::Paris,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            card_replies: true,
            templates_path: None,
            google_access_token: None,
            google_credentials_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: var("APP_HOST").unwrap_or(defaults.host),
            port: var("APP_PORT")
                .or_else(|_| var("PORT"))
                .unwrap_or(defaults.port),
            spreadsheet_id: non_empty("SPREADSHEET_ID"),
            sheet_name: non_empty("SHEET_NAME").unwrap_or(defaults.sheet_name),
            target_color: parsed_or("ONCALL_TARGET_COLOR", defaults.target_color, parse_rgb),
            tolerance: parsed_or("ONCALL_COLOR_TOLERANCE", defaults.tolerance, parse_tolerance),
            destinations: non_empty("CHAT_DESTINATIONS")
                .map(|raw| parse_destinations(&raw))
                .unwrap_or_default(),
            timezone: parsed_or("APP_TIMEZONE", defaults.timezone, |raw| {
                Tz::from_str(raw.trim()).ok()
            }),
            max_message_length: parsed_or("MAX_MESSAGE_LENGTH", defaults.max_message_length, |raw| {
                raw.trim().parse().ok()
            }),
            card_replies: parsed_or("CARD_REPLIES", defaults.card_replies, parse_bool),
            templates_path: non_empty("TEMPLATES_PATH"),
            google_access_token: non_empty("GOOGLE_ACCESS_TOKEN"),
            google_credentials_path: non_empty("GOOGLE_APPLICATION_CREDENTIALS"),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn destination(&self, name: &str) -> Option<&Destination> {
        self.destinations
            .iter()
            .find(|dest| dest.name.eq_ignore_ascii_case(name))
    }
}

fn non_empty(key: &str) -> Option<String> {
    var(key).ok().filter(|value| !value.trim().is_empty())
}

// 格式錯誤時退回預設值
fn parsed_or<T, F>(key: &str, default: T, parse: F) -> T
where
    F: Fn(&str) -> Option<T>,
{
    match non_empty(key) {
        Some(raw) => parse(&raw).unwrap_or_else(|| {
            tracing::warn!("invalid value for {}: {:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}

/// 必須是有限的正數
pub fn parse_tolerance(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|tolerance| tolerance.is_finite() && *tolerance > 0.0)
}

/// `"0.851,0.886,0.953"`
pub fn parse_rgb(raw: &str) -> Option<Rgb> {
    let channels = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;

    match channels.as_slice() {
        [red, green, blue] => Some(Rgb {
            red: *red,
            green: *green,
            blue: *blue,
        }),
        _ => None,
    }
}

/// `"incidents=spaces/AAA, mep=spaces/BBB"`
pub fn parse_destinations(raw: &str) -> Vec<Destination> {
    raw.split(',')
        .filter_map(|pair| {
            let (name, space) = pair.split_once('=')?;
            let (name, space) = (name.trim(), space.trim());
            if name.is_empty() || space.is_empty() {
                return None;
            }
            Some(Destination {
                name: name.to_string(),
                space: space.to_string(),
            })
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
