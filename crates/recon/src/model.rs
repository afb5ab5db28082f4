use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single raw cell value as delivered by a loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// One source's tabular export: ordered headers, rows of cells.
///
/// Every row holds exactly one cell per header; short rows are padded with
/// `Cell::Empty` and long rows truncated on insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn with_rows(headers: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        let mut ds = Self::new(headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            ds.push_row(row);
        }
        ds
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Iterate one column's cells top to bottom. Unknown header yields nothing.
    pub fn column<'a>(&'a self, header: &str) -> impl Iterator<Item = &'a Cell> + 'a {
        let idx = self.column_index(header);
        self.rows.iter().filter_map(move |row| idx.and_then(|i| row.get(i)))
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Semantic transaction attributes, in declared priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Date,
    Partner,
    BusinessId,
    SupplyAmount,
    TaxAmount,
    TotalAmount,
    ItemDescription,
    DocumentNumber,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 8] = [
        Self::Date,
        Self::Partner,
        Self::BusinessId,
        Self::SupplyAmount,
        Self::TaxAmount,
        Self::TotalAmount,
        Self::ItemDescription,
        Self::DocumentNumber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Partner => "partner",
            Self::BusinessId => "business_id",
            Self::SupplyAmount => "supply_amount",
            Self::TaxAmount => "tax_amount",
            Self::TotalAmount => "total_amount",
            Self::ItemDescription => "item_description",
            Self::DocumentNumber => "document_number",
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical field → raw header resolved for it in one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    fields: BTreeMap<CanonicalField, String>,
}

impl ColumnMapping {
    pub fn insert(&mut self, field: CanonicalField, header: impl Into<String>) {
        self.fields.insert(field, header.into());
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.fields.iter().map(|(f, h)| (*f, h.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// A grouping-key value taken verbatim from a cell.
///
/// Numbers and text never compare equal, and no case/format folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Number(OrderedFloat<f64>),
    Text(String),
}

impl GroupKey {
    /// `None` for empty cells: rows without a key are not grouped.
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Number(n) if n.is_nan() => None,
            Cell::Number(n) => Some(Self::Number(OrderedFloat(*n))),
            Cell::Text(s) => Some(Self::Text(s.clone())),
            Cell::Empty => None,
        }
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", n.0 as i64),
            Self::Number(n) => write!(f, "{}", n.0),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Per-dataset summed amount per grouping key.
pub type Ledger = BTreeMap<GroupKey, i64>;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingEntry {
    pub key: GroupKey,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MismatchEntry {
    pub key: GroupKey,
    pub amount_a: i64,
    pub amount_b: i64,
    pub diff: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Discrepancies {
    /// Present in A only (A > 0, B == 0).
    pub missing_in_b: Vec<MissingEntry>,
    /// Present in B only (A == 0, B > 0).
    pub missing_in_a: Vec<MissingEntry>,
    pub amount_mismatch: Vec<MismatchEntry>,
}

impl Discrepancies {
    pub fn len(&self) -> usize {
        self.missing_in_b.len() + self.missing_in_a.len() + self.amount_mismatch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideSummary {
    pub row_count: usize,
    pub total: i64,
}

/// Immutable outcome of one reconciliation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconResult {
    pub label: String,
    /// Grouping field used, `None` when grouped comparison was skipped.
    pub key_field: Option<CanonicalField>,
    pub side_a: SideSummary,
    pub side_b: SideSummary,
    /// `side_a.total - side_b.total`
    pub delta: i64,
    #[serde(flatten)]
    pub discrepancies: Discrepancies,
}

impl ReconResult {
    pub fn missing_in_b(&self) -> &[MissingEntry] {
        &self.discrepancies.missing_in_b
    }

    pub fn missing_in_a(&self) -> &[MissingEntry] {
        &self.discrepancies.missing_in_a
    }

    pub fn amount_mismatch(&self) -> &[MismatchEntry] {
        &self.discrepancies.amount_mismatch
    }

    pub fn issue_count(&self) -> usize {
        self.discrepancies.len()
    }

    /// True when totals agree and no key-level discrepancy was found.
    pub fn is_clean(&self) -> bool {
        self.delta == 0 && self.discrepancies.is_empty()
    }
}

/// VAT payable projection derived from a sales/purchases result pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VatEstimate {
    pub rate: f64,
    pub sales_tax: f64,
    pub purchase_tax: f64,
    pub payable: f64,
}
