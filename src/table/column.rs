//! Column descriptors and typed cell values.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::i18n::Language;

/// A typed value read out of a row by a column accessor.
///
/// Sorting compares `CellValue`s with their natural ordering instead of
/// comparing display strings, so `9 < 10` and dates sort chronologically.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// No value.
    Empty,
    /// Free text, ordered case-insensitively.
    Text(String),
    /// Whole number.
    Int(i64),
    /// Decimal number.
    Number(f64),
    /// Flag.
    Bool(bool),
    /// Point in time.
    Date(DateTime<Utc>),
}

impl CellValue {
    /// Ordering between values of different kinds.
    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Number(_) => 2,
            CellValue::Date(_) => 3,
            CellValue::Text(_) => 4,
        }
    }

    /// Natural ordering of two cell values.
    ///
    /// Empty values sort before everything else. Integers and decimals are
    /// compared numerically with each other.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Int(a), CellValue::Number(b)) => (*a as f64).total_cmp(b),
            (CellValue::Number(a), CellValue::Int(b)) => a.total_cmp(&(*b as f64)),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Number(n) if n.fract() == 0.0 => write!(f, "{:.0}", n),
            CellValue::Number(n) => write!(f, "{:.2}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::Date(value)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Reads a typed value out of a row.
pub type Accessor<T> = Box<dyn Fn(&T) -> CellValue>;

/// Produces the display text of a cell.
pub type CellRenderer<T> = Box<dyn Fn(&T, Language) -> String>;

/// Custom ordering between two rows.
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// Describes one displayable, sortable field of a row type `T`.
pub struct Column<T> {
    id: &'static str,
    header: (&'static str, &'static str),
    accessor: Accessor<T>,
    renderer: Option<CellRenderer<T>>,
    comparator: Option<Comparator<T>>,
    sortable: bool,
    width: u16,
}

impl<T> Column<T> {
    /// Create a column from an id, an `(english, arabic)` header and an accessor.
    pub fn new(
        id: &'static str,
        header: (&'static str, &'static str),
        accessor: impl Fn(&T) -> CellValue + 'static,
    ) -> Self {
        Self {
            id,
            header,
            accessor: Box::new(accessor),
            renderer: None,
            comparator: None,
            sortable: true,
            width: 1,
        }
    }

    /// Use a custom renderer for the cell text.
    pub fn render(mut self, renderer: impl Fn(&T, Language) -> String + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Sort with a custom comparator instead of the accessor's natural order.
    pub fn compare_by(mut self, comparator: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        self.comparator = Some(Box::new(comparator));
        self
    }

    /// Exclude this column from header-click sorting.
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Relative width weight used by renderers.
    pub fn width(mut self, width: u16) -> Self {
        self.width = width.max(1);
        self
    }

    /// The column id.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The header label in the given language.
    pub fn header(&self, lang: Language) -> &'static str {
        lang.pick(self.header.0, self.header.1)
    }

    /// Whether clicking the header sorts by this column.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Relative width weight.
    pub fn width_weight(&self) -> u16 {
        self.width
    }

    /// The typed value of this column for a row.
    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }

    /// The display text of this column for a row.
    pub fn cell_text(&self, row: &T, lang: Language) -> String {
        match &self.renderer {
            Some(render) => render(row, lang),
            None => self.value(row).to_string(),
        }
    }

    /// Compare two rows by this column.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        match &self.comparator {
            Some(cmp) => cmp(a, b),
            None => self.value(a).compare(&self.value(b)),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("width", &self.width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Item {
        name: &'static str,
        qty: u32,
    }

    #[test]
    fn test_numeric_compare_is_by_magnitude() {
        assert_eq!(CellValue::Int(9).compare(&CellValue::Int(10)), Ordering::Less);
        assert_eq!(
            CellValue::Number(2.5).compare(&CellValue::Int(2)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_text_compare_ignores_case_first() {
        let a = CellValue::from("apple");
        let b = CellValue::from("Banana");
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn test_date_compare_is_chronological() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
        assert_eq!(
            CellValue::from(early).compare(&CellValue::from(late)),
            Ordering::Less
        );
    }

    #[test]
    fn test_empty_sorts_first() {
        assert_eq!(CellValue::Empty.compare(&CellValue::Int(0)), Ordering::Less);
        assert_eq!(
            CellValue::from(None::<u32>).compare(&CellValue::from("a")),
            Ordering::Less
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(12.0).to_string(), "12");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.50");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_column_renderer_and_comparator() {
        let col = Column::new("name", ("Name", "الاسم"), |i: &Item| i.name.into())
            .render(|i, _| i.name.to_uppercase())
            .compare_by(|a, b| a.qty.cmp(&b.qty));

        let a = Item { name: "zed", qty: 1 };
        let b = Item { name: "amy", qty: 2 };
        assert_eq!(col.cell_text(&a, Language::English), "ZED");
        assert_eq!(col.compare(&a, &b), Ordering::Less);
        assert_eq!(col.header(Language::Arabic), "الاسم");
        assert!(col.is_sortable());
    }
}
