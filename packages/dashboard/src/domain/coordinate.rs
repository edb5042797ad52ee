//! Conversions between zero-based grid indices and the labels players read.
//!
//! Columns are lettered (`A`, `B`, ... `Z`, then `AA`, `AB`, ...) and rows
//! are numbered from 1. The free functions are total over every index;
//! [`GridLabels`] adds the bounds of one concrete grid.

use super::{error::CoordinateError, value_object::GridPosition};

const ALPHABET_LEN: usize = 26;

/// Column index to letters: `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`.
pub fn index_to_column_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        // n % 26 < 26, the cast cannot truncate
        letters.push(b'A' + (n % ALPHABET_LEN) as u8);
        if n < ALPHABET_LEN {
            break;
        }
        n = n / ALPHABET_LEN - 1;
    }
    letters.reverse();
    letters.into_iter().map(char::from).collect()
}

/// Row index to its 1-based label.
pub fn index_to_row_label(index: usize) -> String {
    // usize is at most 64 bits, so `usize::MAX + 1` still fits
    (index as u128 + 1).to_string()
}

/// Letters back to a column index, case-insensitive.
///
/// # Errors
///
/// Returns `CoordinateError::EmptyColumnLabel` for an empty label and
/// `CoordinateError::InvalidColumnLabel` for anything but ASCII letters or a
/// label too long to be an index.
pub fn column_label_to_index(label: &str) -> Result<usize, CoordinateError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(CoordinateError::EmptyColumnLabel);
    }

    let invalid = || CoordinateError::InvalidColumnLabel(label.to_string());
    let mut n: u128 = 0;
    for c in label.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(invalid());
        }
        let digit = u128::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
        n = n
            .checked_mul(ALPHABET_LEN as u128)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(invalid)?;
    }
    usize::try_from(n - 1).map_err(|_| invalid())
}

/// 1-based row label back to a zero-based index.
///
/// # Errors
///
/// Returns `CoordinateError::EmptyRowLabel` for an empty label and
/// `CoordinateError::InvalidRowLabel` for `0` or anything non-numeric.
pub fn row_label_to_index(label: &str) -> Result<usize, CoordinateError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(CoordinateError::EmptyRowLabel);
    }
    match label.parse::<u128>() {
        Ok(n) if n >= 1 => usize::try_from(n - 1)
            .map_err(|_| CoordinateError::InvalidRowLabel(label.to_string())),
        _ => Err(CoordinateError::InvalidRowLabel(label.to_string())),
    }
}

/// Label conversions bounded to one `width` x `height` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLabels {
    width: usize,
    height: usize,
}

impl GridLabels {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Header labels for every column, left to right.
    pub fn column_labels(&self) -> impl Iterator<Item = String> {
        (0..self.width).map(index_to_column_label)
    }

    /// Header labels for every row, top to bottom.
    pub fn row_labels(&self) -> impl Iterator<Item = String> {
        (0..self.height).map(index_to_row_label)
    }

    /// # Errors
    ///
    /// Returns `CoordinateError::OutOfBounds` when `x` is not a column.
    pub fn column_label(&self, x: usize) -> Result<String, CoordinateError> {
        check_bounds("column", x, self.width)?;
        Ok(index_to_column_label(x))
    }

    /// # Errors
    ///
    /// Returns `CoordinateError::OutOfBounds` when `y` is not a row.
    pub fn row_label(&self, y: usize) -> Result<String, CoordinateError> {
        check_bounds("row", y, self.height)?;
        Ok(index_to_row_label(y))
    }

    /// Label such as `B3` for a position.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateError::OutOfBounds` for a position off the grid.
    pub fn cell_label(&self, position: GridPosition) -> Result<String, CoordinateError> {
        Ok(format!(
            "{}{}",
            self.column_label(position.x)?,
            self.row_label(position.y)?
        ))
    }

    /// # Errors
    ///
    /// Label errors, or `CoordinateError::OutOfBounds`.
    pub fn parse_column(&self, label: &str) -> Result<usize, CoordinateError> {
        let x = column_label_to_index(label)?;
        check_bounds("column", x, self.width)?;
        Ok(x)
    }

    /// # Errors
    ///
    /// Label errors, or `CoordinateError::OutOfBounds`.
    pub fn parse_row(&self, label: &str) -> Result<usize, CoordinateError> {
        let y = row_label_to_index(label)?;
        check_bounds("row", y, self.height)?;
        Ok(y)
    }

    /// Parse a combined cell label (`B3`, `b3`, `AA12`) into a position.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateError::InvalidCellLabel` when the label does not
    /// split into letters followed by digits, otherwise the column/row error.
    pub fn parse_cell(&self, label: &str) -> Result<GridPosition, CoordinateError> {
        let label = label.trim();
        let split = label
            .find(|c: char| c.is_ascii_digit())
            .filter(|&i| i > 0)
            .ok_or_else(|| CoordinateError::InvalidCellLabel(label.to_string()))?;
        let (column, row) = label.split_at(split);
        Ok(GridPosition::new(
            self.parse_column(column)?,
            self.parse_row(row)?,
        ))
    }
}

fn check_bounds(axis: &'static str, index: usize, size: usize) -> Result<(), CoordinateError> {
    if index < size {
        Ok(())
    } else {
        Err(CoordinateError::OutOfBounds { axis, index, size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letter_columns() {
        // テスト項目: 0..26 の列番号は A..Z に対応する
        // then (期待する結果):
        assert_eq!(index_to_column_label(0), "A");
        assert_eq!(index_to_column_label(1), "B");
        assert_eq!(index_to_column_label(25), "Z");
    }

    #[test]
    fn test_multi_letter_columns() {
        // テスト項目: 26 以上の列番号は AA, AB, ... と続く
        // then (期待する結果):
        assert_eq!(index_to_column_label(26), "AA");
        assert_eq!(index_to_column_label(27), "AB");
        assert_eq!(index_to_column_label(51), "AZ");
        assert_eq!(index_to_column_label(52), "BA");
        assert_eq!(index_to_column_label(701), "ZZ");
        assert_eq!(index_to_column_label(702), "AAA");
    }

    #[test]
    fn test_column_round_trip() {
        // テスト項目: 列ラベルの変換は往復で元の番号に戻る
        // then (期待する結果):
        for i in 0..26 {
            assert_eq!(column_label_to_index(&index_to_column_label(i)), Ok(i));
        }
        for i in [26, 51, 52, 701, 702, 18_277] {
            assert_eq!(column_label_to_index(&index_to_column_label(i)), Ok(i));
        }
    }

    #[test]
    fn test_column_label_is_case_insensitive() {
        // テスト項目: 列ラベルは大文字小文字を区別しない
        // then (期待する結果):
        assert_eq!(column_label_to_index("c"), Ok(2));
        assert_eq!(column_label_to_index("aB"), Ok(27));
    }

    #[test]
    fn test_column_label_rejects_invalid() {
        // テスト項目: 空文字や英字以外の列ラベルはエラーになる
        // then (期待する結果):
        assert_eq!(
            column_label_to_index(""),
            Err(CoordinateError::EmptyColumnLabel)
        );
        assert_eq!(
            column_label_to_index("B2"),
            Err(CoordinateError::InvalidColumnLabel("B2".to_string()))
        );
        assert!(column_label_to_index(&"Z".repeat(40)).is_err());
    }

    #[test]
    fn test_row_round_trip() {
        // テスト項目: 行ラベルは 1 始まりで、往復で元の番号に戻る
        // then (期待する結果):
        assert_eq!(index_to_row_label(0), "1");
        for i in [0, 1, 4, 99, 10_000] {
            assert_eq!(row_label_to_index(&index_to_row_label(i)), Ok(i));
        }
    }

    #[test]
    fn test_labels_at_largest_index() {
        // テスト項目: usize::MAX の列・行番号でもあふれずにラベル化でき、往復で元に戻る
        // when (操作):
        let column = index_to_column_label(usize::MAX);
        let row = index_to_row_label(usize::MAX);

        // then (期待する結果):
        assert!(column.chars().all(|c| c.is_ascii_uppercase()));
        assert_eq!(column_label_to_index(&column), Ok(usize::MAX));
        assert_eq!(row, (u128::from(usize::MAX as u64) + 1).to_string());
        assert_eq!(row_label_to_index(&row), Ok(usize::MAX));
    }

    #[test]
    fn test_labels_beyond_largest_index_are_rejected() {
        // テスト項目: usize に収まらない番号を表すラベルはエラーになる
        // given (前提条件):
        let column = index_to_column_label(usize::MAX);
        let past_column = format!("{column}A");
        let past_row = (u128::from(usize::MAX as u64) + 2).to_string();

        // then (期待する結果):
        assert!(column_label_to_index(&past_column).is_err());
        assert_eq!(
            row_label_to_index(&past_row),
            Err(CoordinateError::InvalidRowLabel(past_row.clone()))
        );
    }

    #[test]
    fn test_row_label_rejects_zero_and_garbage() {
        // テスト項目: 0 や数値以外の行ラベルはエラーになる
        // then (期待する結果):
        assert_eq!(
            row_label_to_index("0"),
            Err(CoordinateError::InvalidRowLabel("0".to_string()))
        );
        assert_eq!(
            row_label_to_index("-1"),
            Err(CoordinateError::InvalidRowLabel("-1".to_string()))
        );
        assert_eq!(row_label_to_index(" "), Err(CoordinateError::EmptyRowLabel));
    }

    #[test]
    fn test_grid_labels_parse_cell() {
        // テスト項目: "B3" のようなセルラベルを位置に変換できる
        // given (前提条件):
        let labels = GridLabels::new(5, 5);

        // when (操作):
        let position = labels.parse_cell("b3");

        // then (期待する結果):
        assert_eq!(position, Ok(GridPosition::new(1, 2)));
        assert_eq!(labels.cell_label(GridPosition::new(1, 2)).unwrap(), "B3");
    }

    #[test]
    fn test_grid_labels_reject_out_of_bounds() {
        // テスト項目: グリッド外のラベルは範囲外エラーになる
        // given (前提条件):
        let labels = GridLabels::new(5, 5);

        // then (期待する結果):
        assert_eq!(
            labels.parse_cell("F1"),
            Err(CoordinateError::OutOfBounds {
                axis: "column",
                index: 5,
                size: 5
            })
        );
        assert_eq!(
            labels.parse_cell("A6"),
            Err(CoordinateError::OutOfBounds {
                axis: "row",
                index: 5,
                size: 5
            })
        );
        assert_eq!(
            labels.parse_cell("33"),
            Err(CoordinateError::InvalidCellLabel("33".to_string()))
        );
        assert_eq!(
            labels.parse_cell("C"),
            Err(CoordinateError::InvalidCellLabel("C".to_string()))
        );
    }

    #[test]
    fn test_grid_labels_headers() {
        // テスト項目: ヘッダー用のラベル列を生成できる
        // given (前提条件):
        let labels = GridLabels::new(3, 2);

        // then (期待する結果):
        assert_eq!(labels.column_labels().collect::<Vec<_>>(), ["A", "B", "C"]);
        assert_eq!(labels.row_labels().collect::<Vec<_>>(), ["1", "2"]);
    }
}
