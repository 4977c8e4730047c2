//! Loosely-typed spreadsheet cells.
//!
//! A sheet range arrives as rows of JSON values. Cells keep their original
//! kind so the table builder can type-check before extracting a string,
//! instead of coercing numbers or booleans into keys.

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
    /// Arrays, objects or numbers that do not fit an f64.
    Other,
}

/// One spreadsheet row. Only the first two cells are meaningful.
pub type RawRow = Vec<Cell>;

impl Cell {
    /// Returns the string payload if this is a non-empty string cell.
    pub fn as_non_empty_str(&self) -> Option<&str> {
        match self {
            Cell::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Short name of the cell kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::String(_) => "string",
            Cell::Number(_) => "number",
            Cell::Bool(_) => "bool",
            Cell::Null => "null",
            Cell::Other => "other",
        }
    }
}

impl From<serde_json::Value> for Cell {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Cell::String(s),
            serde_json::Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Other),
            serde_json::Value::Bool(b) => Cell::Bool(b),
            serde_json::Value::Null => Cell::Null,
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Cell::Other,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::String(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::String(s)
    }
}

/// Convert a JSON row (as returned by the Sheets values API) into a raw row.
pub fn row_from_json(values: Vec<serde_json::Value>) -> RawRow {
    values.into_iter().map(Cell::from).collect()
}
