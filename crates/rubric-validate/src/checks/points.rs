//! `points_lost` coercion checks.
//!
//! Blank cells fail numeric coercion. Both checks pass trivially when the
//! column is absent.

use rubric_model::{CanonicalField, RawTable, parse_points};

use crate::report::{CheckResult, Invariant};

pub fn check_non_numeric(table: &RawTable) -> CheckResult {
    let count = points_cells(table).map_or(0, |cells| {
        cells.filter(|cell| parse_points(cell).is_none()).count()
    });
    CheckResult::count(Invariant::NonNumericPointsLost, count)
}

pub fn check_negative(table: &RawTable) -> CheckResult {
    let count = points_cells(table).map_or(0, |cells| {
        cells
            .filter_map(parse_points)
            .filter(|points| *points < 0.0)
            .count()
    });
    CheckResult::count(Invariant::NegativePointsLost, count)
}

fn points_cells(table: &RawTable) -> Option<impl Iterator<Item = &str> + '_> {
    table.column_values(CanonicalField::PointsLost.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CheckDetail;

    fn points_table(values: &[&str]) -> RawTable {
        RawTable::from_rows(&["points_lost"], values.iter().map(|v| [*v]))
    }

    #[test]
    fn blank_and_text_are_non_numeric() {
        let table = points_table(&["1", "", "abc", "NaN", "2.5"]);
        assert_eq!(check_non_numeric(&table).detail, CheckDetail::Count(3));
    }

    #[test]
    fn negatives_are_counted_separately() {
        let table = points_table(&["-1", "-0.5", "x", "0"]);
        assert_eq!(check_negative(&table).detail, CheckDetail::Count(2));
        assert_eq!(check_non_numeric(&table).detail, CheckDetail::Count(1));
    }

    #[test]
    fn absent_column_passes() {
        let table = RawTable::from_rows(&["student_id"], [["s1"]]);
        assert!(check_non_numeric(&table).ok);
        assert!(check_negative(&table).ok);
    }
}
