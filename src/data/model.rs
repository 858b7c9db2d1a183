use std::fmt;

use serde::Serialize;

/// Column holding the white side's back-rank identifier.
pub const WHITE_COLUMN: &str = "white";
/// Column holding the black side's back-rank identifier.
pub const BLACK_COLUMN: &str = "black";
/// Column holding the DFRC position id.
pub const DFRC_ID_COLUMN: &str = "dfrc_id";

/// Columns the link formatter reads from a selected row.
pub const REQUIRED_COLUMNS: [&str; 3] = [WHITE_COLUMN, BLACK_COLUMN, DFRC_ID_COLUMN];

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the Arrow types we normalise to.
/// Must be `Ord` so that table columns can be sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.4}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Borrow the value as text, if it is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Logical type of a column after normalising Arrow's physical variants
/// (`Utf8`, `LargeUtf8` and dictionary strings are all `Text`, etc).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Bool,
    /// Any other Arrow type, rendered to text for display only.
    Other,
}

/// One named, typed column of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Column {
            name: name.into(),
            kind,
            values: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered, fixed-schema table of analysis rows.
///
/// Column order and row order follow the source file. Every column holds
/// exactly [`Dataset::len`] values.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Dataset {
    /// Build a dataset from columns of equal length.
    ///
    /// Returns `None` if the columns disagree on their length.
    pub fn from_columns(columns: Vec<Column>) -> Option<Self> {
        let num_rows = columns.first().map_or(0, |c| c.values.len());
        if columns.iter().any(|c| c.values.len() != num_rows) {
            return None;
        }
        Some(Dataset { columns, num_rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.num_rows
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Which of the columns needed to build analysis links are absent.
    pub fn missing_required_columns(&self) -> Vec<&'static str> {
        REQUIRED_COLUMNS
            .into_iter()
            .filter(|name| self.column(name).is_none())
            .collect()
    }

    /// Borrow row `index`, or `None` if out of range.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.num_rows).then_some(Row {
            dataset: self,
            index,
        })
    }
}

// ---------------------------------------------------------------------------
// Row – borrowed view of one row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> Row<'a> {
    /// Position of this row in the dataset.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell of column `name`, or `None` if there is no such column.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.dataset
            .column(name)
            .and_then(|c| c.values.get(self.index))
    }

    /// All cells of this row paired with their column names, in file order.
    pub fn cells(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        let (dataset, index) = (self.dataset, self.index);
        dataset
            .columns
            .iter()
            .map(move |c| (c.name.as_str(), &c.values[index]))
    }

    pub fn white(&self) -> Option<&'a str> {
        self.get(WHITE_COLUMN).and_then(Value::as_str)
    }

    pub fn black(&self) -> Option<&'a str> {
        self.get(BLACK_COLUMN).and_then(Value::as_str)
    }

    /// The DFRC id as text; stored either as a string or an integer.
    pub fn dfrc_id(&self) -> Option<String> {
        match self.get(DFRC_ID_COLUMN)? {
            Value::Text(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            _ => None,
        }
    }
}
