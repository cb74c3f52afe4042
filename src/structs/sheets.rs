use serde::{Deserialize, Serialize};

/// Sheets API 的顏色，值為 0 的 channel 會被省略
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    #[serde(default)]
    pub red: f64,
    #[serde(default)]
    pub green: f64,
    #[serde(default)]
    pub blue: f64,
}

#[derive(Deserialize, Debug, Default)]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Sheet {
    #[serde(default)]
    pub data: Vec<GridData>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    #[serde(default)]
    pub row_data: Vec<RowData>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RowData {
    #[serde(default)]
    pub values: Vec<CellData>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub formatted_value: Option<String>,
    pub effective_format: Option<CellFormat>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    pub background_color: Option<Rgb>,
}

/// 掃描用的單一儲存格
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridCell {
    pub value: String,
    pub background: Option<Rgb>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridRow {
    pub cells: Vec<GridCell>,
}

impl GridRow {
    pub fn value(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(|cell| cell.value.as_str())
    }
}

impl From<RowData> for GridRow {
    fn from(row: RowData) -> Self {
        let cells = row
            .values
            .into_iter()
            .map(|cell| GridCell {
                value: cell.formatted_value.unwrap_or_default(),
                background: cell.effective_format.and_then(|format| format.background_color),
            })
            .collect();

        GridRow { cells }
    }
}

impl Spreadsheet {
    /// 只取第一個分頁的第一個 grid
    pub fn into_rows(self) -> Vec<GridRow> {
        self.sheets
            .into_iter()
            .next()
            .and_then(|sheet| sheet.data.into_iter().next())
            .map(|grid| grid.row_data.into_iter().map(GridRow::from).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_grid_data_with_omitted_channels() {
        let raw = r#"{
            "sheets": [{
                "data": [{
                    "rowData": [
                        {},
                        {"values": [
                            {"formattedValue": "06-janv.-2025",
                             "effectiveFormat": {"backgroundColor": {"red": 1, "green": 1}}},
                            {"effectiveFormat": {}},
                            {"formattedValue": "Bob"}
                        ]}
                    ]
                }]
            }]
        }"#;

        let rows = serde_json::from_str::<Spreadsheet>(raw).unwrap().into_rows();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].cells.is_empty());
        assert_eq!(rows[1].value(0), Some("06-janv.-2025"));
        assert_eq!(
            rows[1].cells[0].background,
            Some(Rgb {
                red: 1.0,
                green: 1.0,
                blue: 0.0
            })
        );
        assert_eq!(rows[1].cells[1].background, None);
        assert_eq!(rows[1].value(1), Some(""));
        assert_eq!(rows[1].value(2), Some("Bob"));
        assert_eq!(rows[1].value(3), None);
    }

    #[test]
    fn empty_spreadsheet_has_no_rows() {
        let rows = serde_json::from_str::<Spreadsheet>("{}").unwrap().into_rows();
        assert!(rows.is_empty());
    }
}
