use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell coordinate (0-indexed internally)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        CellCoord { row, col }
    }

    /// Convert to A1 notation (e.g., (0, 0) -> "A1")
    pub fn to_a1(&self) -> String {
        format!("{}{}", col_to_label(self.col), self.row + 1)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl From<(usize, usize)> for CellCoord {
    fn from((row, col): (usize, usize)) -> Self {
        CellCoord::new(row, col)
    }
}

/// Convert column index (0-indexed) to label (A, B, ..., Z, AA, AB, ...)
pub fn col_to_label(col: usize) -> String {
    let mut label = String::new();
    let mut n = col + 1;

    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }

    label
}

/// Convert column label (A, B, ..., Z, AA, AB, ...) to index (0-indexed)
pub fn col_from_label(label: &str) -> Option<usize> {
    let mut col: usize = 0;

    for c in label.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        col = col.checked_mul(26)?.checked_add(c as usize - 'A' as usize + 1)?;
    }

    col.checked_sub(1)
}

/// Parse a cell reference such as `B7` or `AA12`
fn parse_single_ref(text: &str) -> Option<CellCoord> {
    let split = text.find(|c: char| !c.is_ascii_uppercase())?;
    let (letters, digits) = text.split_at(split);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let col = col_from_label(letters)?;
    let row: usize = digits.parse().ok()?;
    Some(CellCoord::new(row.checked_sub(1)?, col))
}

/// Inclusive rectangular range. `start` is never below or right of `end`.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRange {
    start: CellCoord,
    end: CellCoord,
}

impl CellRange {
    /// Build a range from its corners; `None` when the range is reversed
    pub fn new(start: CellCoord, end: CellCoord) -> Option<Self> {
        if start.row > end.row || start.col > end.col {
            return None;
        }
        Some(CellRange { start, end })
    }

    /// Parse `<Letters><Row>:<Letters><Row>` with upper-case column letters.
    /// Any other shape, row `0`, or a start past the end yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let (start, end) = text.split_once(':')?;
        Self::new(parse_single_ref(start)?, parse_single_ref(end)?)
    }

    pub fn start(&self) -> CellCoord {
        self.start
    }

    pub fn end(&self) -> CellCoord {
        self.end
    }

    pub fn row_count(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    /// Number of cells covered, saturating at `usize::MAX`
    pub fn area(&self) -> usize {
        self.row_count().saturating_mul(self.col_count())
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        (self.start.row..=self.end.row).contains(&coord.row)
            && (self.start.col..=self.end.col).contains(&coord.col)
    }

    /// The part of this range inside a `rows` x `cols` grid
    pub fn clip(&self, rows: usize, cols: usize) -> Option<CellRange> {
        let end = CellCoord::new(
            self.end.row.min(rows.checked_sub(1)?),
            self.end.col.min(cols.checked_sub(1)?),
        );
        Self::new(self.start, end)
    }

    /// Coordinates in row-major order (rows outer, columns inner)
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let CellRange { start, end } = *self;
        (start.row..=end.row)
            .flat_map(move |row| (start.col..=end.col).map(move |col| CellCoord::new(row, col)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Expand a range reference like `A1:B3` into its coordinates, row-major.
///
/// Every coordinate is materialized; callers evaluating against a grid
/// should use [`CellRange`] and clip it first. Text that is not a valid
/// range yields an empty list.
pub fn parse_range(text: &str) -> Vec<CellCoord> {
    CellRange::parse(text)
        .map(|range| range.cells().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pairs: &[(usize, usize)]) -> Vec<CellCoord> {
        pairs.iter().copied().map(CellCoord::from).collect()
    }

    #[test]
    fn test_col_labels() {
        assert_eq!(col_to_label(0), "A");
        assert_eq!(col_to_label(25), "Z");
        assert_eq!(col_to_label(26), "AA");
        assert_eq!(col_to_label(701), "ZZ");

        assert_eq!(col_from_label("A"), Some(0));
        assert_eq!(col_from_label("Z"), Some(25));
        assert_eq!(col_from_label("AA"), Some(26));
        assert_eq!(col_from_label(""), None);
        assert_eq!(col_from_label("a"), None);
    }

    #[test]
    fn test_to_a1() {
        assert_eq!(CellCoord::new(0, 0).to_a1(), "A1");
        assert_eq!(CellCoord::new(9, 2).to_string(), "C10");
    }

    #[test]
    fn test_parse_range_row_major() {
        assert_eq!(
            parse_range("A1:B2"),
            coords(&[(0, 0), (0, 1), (1, 0), (1, 1)])
        );
        assert_eq!(parse_range("C3:C3"), coords(&[(2, 2)]));
        assert_eq!(parse_range("A1:A3"), coords(&[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn test_parse_range_rejects_other_shapes() {
        for text in [
            "garbage", "", "A1", "A1:", ":B2", "a1:b2", "1:2", "A0:B2", "A1:B", "A1-B2",
            "A1:B2:C3", " A1:B2", "A1:B2 ",
        ] {
            assert!(parse_range(text).is_empty(), "{:?}", text);
        }
    }

    #[test]
    fn test_parse_range_reversed_is_empty() {
        assert!(parse_range("B2:A1").is_empty());
        assert!(parse_range("A3:A1").is_empty());
    }

    #[test]
    fn test_parse_range_past_grid_extent() {
        let range = parse_range("Z99:Z100");
        assert_eq!(range, coords(&[(98, 25), (99, 25)]));
        assert_eq!(parse_range("ZZ1:ZZ2"), coords(&[(0, 701), (1, 701)]));
        assert_eq!(parse_range("AA1:AB1"), coords(&[(0, 26), (0, 27)]));
    }

    #[test]
    fn test_cell_range_bounds() {
        let range = CellRange::parse("B2:D3").unwrap();
        assert_eq!(range.start(), CellCoord::new(1, 1));
        assert_eq!(range.end(), CellCoord::new(2, 3));
        assert_eq!((range.row_count(), range.col_count(), range.area()), (2, 3, 6));
        assert_eq!(range.to_string(), "B2:D3");
        assert!(range.contains(CellCoord::new(2, 2)));
        assert!(!range.contains(CellCoord::new(0, 2)));
        assert!(!range.contains(CellCoord::new(1, 4)));
        assert!(CellRange::parse("B2:A1").is_none());
    }

    #[test]
    fn test_cell_range_clip_to_grid() {
        let range = CellRange::parse("A1:ZZZZ9999999").unwrap();
        let clipped = range.clip(2, 3).unwrap();
        assert_eq!(clipped.end(), CellCoord::new(1, 2));
        assert_eq!(clipped.cells().count(), 6);

        assert!(CellRange::parse("ZZ1:ZZ2").unwrap().clip(10, 10).is_none());
        assert!(CellRange::parse("A20:B30").unwrap().clip(10, 10).is_none());
        assert!(range.clip(0, 3).is_none());
    }

    #[test]
    fn test_cell_range_area_saturates() {
        let range = CellRange::parse("A1:ZZZZZZZZZZZZ99999999999").unwrap();
        assert_eq!(range.area(), usize::MAX);
        assert_eq!(range.clip(2, 2).unwrap().area(), 4);
    }
}
