use crate::{
    errors::AppError,
    services::dates::{format_date, parse_date},
    structs::{
        google::GridSource,
        sheets::{GridRow, Rgb},
    },
};
use chrono::NaiveDate;

/// 第 0 列為標題，第 1 列為人名
const HEADER_ROW: usize = 1;
const FIRST_DATA_ROW: usize = 2;
const DATE_COLUMN: usize = 1;

// 消除浮點誤差，差值剛好等於 tolerance 時視為不相符
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub enum OnCallOutcome {
    Found(String),
    NoHighlight,
    DateNotFound,
}

impl OnCallOutcome {
    pub fn message(&self, today: NaiveDate) -> String {
        let date = format_date(today);
        match self {
            OnCallOutcome::Found(name) => {
                format!("👤 Personne d'astreinte aujourd'hui ({}) : **{}**", date, name)
            }
            OnCallOutcome::NoHighlight => {
                format!("Pas d'astreinte trouvée pour aujourd'hui ({}).", date)
            }
            OnCallOutcome::DateNotFound => {
                format!("Date du jour ({}) introuvable dans le planning.", date)
            }
        }
    }
}

pub fn is_close(color: &Rgb, target: &Rgb, tolerance: f64) -> bool {
    let limit = tolerance - EPSILON;
    (color.red - target.red).abs() < limit
        && (color.green - target.green).abs() < limit
        && (color.blue - target.blue).abs() < limit
}

/// 找出今天那一列第一個顏色相符的儲存格
pub fn scan_grid(rows: &[GridRow], today: NaiveDate, target: &Rgb, tolerance: f64) -> OnCallOutcome {
    let Some(header) = rows.get(HEADER_ROW) else {
        return OnCallOutcome::DateNotFound;
    };

    let Some(row) = rows
        .iter()
        .skip(FIRST_DATA_ROW)
        .find(|row| row.value(DATE_COLUMN).and_then(parse_date) == Some(today))
    else {
        return OnCallOutcome::DateNotFound;
    };

    // 同一列有多格相符時取最左邊那格
    let column = row.cells.iter().position(|cell| {
        cell.background
            .as_ref()
            .is_some_and(|color| is_close(color, target, tolerance))
    });

    match column {
        Some(column) => OnCallOutcome::Found(header_name(header, column)),
        None => OnCallOutcome::NoHighlight,
    }
}

fn header_name(header: &GridRow, column: usize) -> String {
    match header.value(column).map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("colonne {}", column + 1),
    }
}

pub async fn lookup(
    source: &dyn GridSource,
    today: NaiveDate,
    target: &Rgb,
    tolerance: f64,
) -> Result<OnCallOutcome, AppError> {
    let rows = source.fetch_rows().await?;
    let outcome = scan_grid(&rows, today, target, tolerance);

    match &outcome {
        OnCallOutcome::Found(name) => tracing::info!("on-call for {}: {}", today, name),
        OnCallOutcome::NoHighlight => tracing::warn!("no highlighted cell for {}", today),
        OnCallOutcome::DateNotFound => tracing::warn!("{} not found in {} rows", today, rows.len()),
    }

    Ok(outcome)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::errors::ConfigError;
    use crate::{
        config::DEFAULT_TARGET_COLOR, state::testing::FakeGrid, structs::sheets::GridCell,
    };

    const WHITE: Rgb = Rgb {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
    };

    pub fn cell(value: &str, background: Option<Rgb>) -> GridCell {
        GridCell {
            value: value.to_string(),
            background,
        }
    }

    pub fn row(cells: Vec<GridCell>) -> GridRow {
        GridRow { cells }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 7).unwrap()
    }

    /// 兩列標題 + 兩列資料，今天那列第 2 欄是目標色
    pub fn schedule(highlight: Option<Rgb>) -> Vec<GridRow> {
        vec![
            row(vec![cell("Planning astreintes", None)]),
            row(vec![cell("", None), cell("Date", None), cell("Alice", None)]),
            row(vec![
                cell("lun.", Some(WHITE)),
                cell("06-janv.-2025", Some(WHITE)),
                cell("", Some(DEFAULT_TARGET_COLOR)),
            ]),
            row(vec![
                cell("mar.", Some(WHITE)),
                cell("07-janv.-2025", Some(WHITE)),
                cell("", highlight),
            ]),
        ]
    }

    #[test]
    fn identical_colors_are_close() {
        let color = Rgb {
            red: 0.851,
            green: 0.886,
            blue: 0.953,
        };
        assert!(is_close(&color, &color, 0.1));
    }

    #[test]
    fn tolerance_is_exclusive() {
        let target = DEFAULT_TARGET_COLOR;
        let near = Rgb {
            red: target.red + 0.09,
            ..target
        };
        let edge = Rgb {
            blue: target.blue - 0.1,
            ..target
        };
        let far = Rgb {
            green: target.green - 0.2,
            ..target
        };

        assert!(is_close(&near, &target, 0.1));
        assert!(!is_close(&edge, &target, 0.1));
        assert!(!is_close(&far, &target, 0.1));
    }

    #[test]
    fn finds_highlighted_person() {
        let rows = schedule(Some(DEFAULT_TARGET_COLOR));
        assert_eq!(
            scan_grid(&rows, today(), &DEFAULT_TARGET_COLOR, 0.1),
            OnCallOutcome::Found("Alice".to_string())
        );
    }

    #[test]
    fn date_present_without_highlight() {
        for highlight in [None, Some(WHITE)] {
            let rows = schedule(highlight);
            let outcome = scan_grid(&rows, today(), &DEFAULT_TARGET_COLOR, 0.1);
            assert_eq!(outcome, OnCallOutcome::NoHighlight);
            assert_eq!(
                outcome.message(today()),
                "Pas d'astreinte trouvée pour aujourd'hui (07/01/2025)."
            );
        }
    }

    #[test]
    fn missing_date_is_reported() {
        let rows = schedule(Some(DEFAULT_TARGET_COLOR));
        let day = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let outcome = scan_grid(&rows, day, &DEFAULT_TARGET_COLOR, 0.1);

        assert_eq!(outcome, OnCallOutcome::DateNotFound);
        assert_eq!(
            outcome.message(day),
            "Date du jour (01/02/2025) introuvable dans le planning."
        );
    }

    #[test]
    fn header_rows_are_never_matched() {
        let mut rows = schedule(None);
        rows[0] = row(vec![cell("", None), cell("07-janv.-2025", None)]);
        rows[1] = row(vec![cell("", None), cell("07-janv.-2025", None)]);
        rows.truncate(2);

        assert_eq!(
            scan_grid(&rows, today(), &DEFAULT_TARGET_COLOR, 0.1),
            OnCallOutcome::DateNotFound
        );
        assert_eq!(
            scan_grid(&[], today(), &DEFAULT_TARGET_COLOR, 0.1),
            OnCallOutcome::DateNotFound
        );
    }

    #[test]
    fn first_matching_column_wins() {
        let mut rows = schedule(Some(DEFAULT_TARGET_COLOR));
        rows[1].cells.push(cell("Bob", None));
        rows[3].cells.push(cell("", Some(DEFAULT_TARGET_COLOR)));

        assert_eq!(
            scan_grid(&rows, today(), &DEFAULT_TARGET_COLOR, 0.1),
            OnCallOutcome::Found("Alice".to_string())
        );
    }

    #[test]
    fn unnamed_column_falls_back_to_index() {
        let mut rows = schedule(None);
        rows[3].cells.push(cell("", Some(DEFAULT_TARGET_COLOR)));

        assert_eq!(
            scan_grid(&rows, today(), &DEFAULT_TARGET_COLOR, 0.1),
            OnCallOutcome::Found("colonne 4".to_string())
        );
    }

    #[test]
    fn found_message_names_the_person() {
        assert_eq!(
            OnCallOutcome::Found("Alice".into()).message(today()),
            "👤 Personne d'astreinte aujourd'hui (07/01/2025) : **Alice**"
        );
    }

    #[tokio::test]
    async fn lookup_reads_from_source() {
        let source = FakeGrid(Ok(schedule(Some(DEFAULT_TARGET_COLOR))));
        let outcome = lookup(&source, today(), &DEFAULT_TARGET_COLOR, 0.1)
            .await
            .unwrap();
        assert_eq!(outcome, OnCallOutcome::Found("Alice".to_string()));
    }

    #[tokio::test]
    async fn lookup_propagates_source_errors() {
        let source = FakeGrid(Err(|| ConfigError::Missing("SPREADSHEET_ID").into()));
        let err = lookup(&source, today(), &DEFAULT_TARGET_COLOR, 0.1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
