//! Small DataFrame row operations shared by the shortage and supply paths.

use std::cmp::Ordering;

use pharm_model::CellValue;
use polars::prelude::{DataFrame, IdxCa, IdxSize};

use crate::error::{CoreError, Result};

/// Select rows by position, in the given order.
pub fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx = indices
        .iter()
        .map(|&i| {
            IdxSize::try_from(i).map_err(|_| CoreError::DataFrame {
                message: format!("row {i} exceeds the frame index range"),
            })
        })
        .collect::<Result<Vec<IdxSize>>>()?;
    let idx = IdxCa::from_vec("idx".into(), idx);
    Ok(df.take(&idx)?)
}

/// Ordering for a serial-number style column: numbers ascending, then text
/// ascending, then missing cells.
pub fn compare_cells(left: &CellValue, right: &CellValue) -> Ordering {
    match (left, right) {
        (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
        (CellValue::Number(_), _) => Ordering::Less,
        (_, CellValue::Number(_)) => Ordering::Greater,
        (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
        (CellValue::Text(_), CellValue::Missing) => Ordering::Less,
        (CellValue::Missing, CellValue::Text(_)) => Ordering::Greater,
        (CellValue::Missing, CellValue::Missing) => Ordering::Equal,
    }
}

/// Row positions ordered by `keys` with [`compare_cells`]; ties keep table order.
pub fn stable_order(keys: &[CellValue]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| compare_cells(&keys[a], &keys[b]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_rows_reorders_and_rejects_out_of_range() {
        let df = polars::df!("연번" => ["a", "b", "c"]).unwrap();
        let taken = take_rows(&df, &[2, 0]).unwrap();
        assert_eq!(
            taken.column("연번").unwrap().str().unwrap().get(0),
            Some("c")
        );
        assert_eq!(taken.height(), 2);
        assert!(take_rows(&df, &[usize::MAX]).is_err());
    }

    #[test]
    fn numbers_sort_numerically_before_text_and_blanks() {
        let keys = vec![
            CellValue::coerce(Some("10")),
            CellValue::coerce(None),
            CellValue::coerce(Some("2")),
            CellValue::coerce(Some("x")),
            CellValue::coerce(Some("2")),
        ];
        assert_eq!(stable_order(&keys), vec![2, 4, 0, 3, 1]);
    }
}
