use chrono::{DateTime, NaiveDate, TimeZone};

/// 訊息中時間戳的格式：`DD/MM/YYYY à HH:MM`
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y à %H:%M";
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// 試算表使用的法文月份縮寫（已去掉結尾的句點）
pub const MONTH_ABBREVIATIONS: [(&str, u32); 12] = [
    ("janv", 1),
    ("févr", 2),
    ("mars", 3),
    ("avr", 4),
    ("mai", 5),
    ("juin", 6),
    ("juil", 7),
    ("août", 8),
    ("sept", 9),
    ("oct", 10),
    ("nov", 11),
    ("déc", 12),
];

fn month_number(token: &str) -> Option<u32> {
    let normalized = token.trim().trim_end_matches('.').to_lowercase();

    MONTH_ABBREVIATIONS
        .iter()
        .find(|(abbreviation, _)| *abbreviation == normalized)
        .map(|(_, month)| *month)
}

/// 解析 `06-janv.-2025`、`06 janv. 2025` 或 `lun. 06-janv.-2025`
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = raw
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    let (position, month) = tokens
        .iter()
        .enumerate()
        .find_map(|(index, token)| month_number(token).map(|month| (index, month)))?;

    let day = tokens.get(position.checked_sub(1)?)?;
    let year = tokens.get(position + 1)?;

    if !day.chars().all(|c| c.is_ascii_digit()) || day.len() > 2 {
        return None;
    }
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

pub fn format_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
