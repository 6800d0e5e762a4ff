use rust_decimal::Decimal;

use crate::error::{ReportError, Result};

/// Number of items a top-spend listing returns when the caller does not ask
/// for a specific count.
pub const DEFAULT_TOP_N: usize = 5;

/// Returns the `n` items with the largest amount, largest first.
///
/// Items whose amount is not strictly positive are dropped: a zero total is
/// the sentinel for "no real spend" and has no place in a top listing. Ties
/// keep input order (the sort is stable). A missing `n` defaults to
/// [`DEFAULT_TOP_N`]; an explicit zero is an invalid argument.
pub fn top_n<T, F>(items: Vec<T>, n: Option<usize>, amount: F) -> Result<Vec<T>>
where
    F: Fn(&T) -> Decimal,
{
    let n = n.unwrap_or(DEFAULT_TOP_N);
    if n == 0 {
        return Err(ReportError::InvalidArgument(
            "top-n limit must be positive".to_string(),
        ));
    }

    let mut kept: Vec<T> = items
        .into_iter()
        .filter(|item| amount(item) > Decimal::ZERO)
        .collect();
    kept.sort_by(|a, b| amount(b).cmp(&amount(a)));
    kept.truncate(n);

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    #[test]
    fn test_returns_largest_first_capped_at_n() {
        let items = vec![("a", dec(10)), ("b", dec(40)), ("c", dec(20)), ("d", dec(30))];

        let top = top_n(items, Some(2), |(_, amount)| *amount).unwrap();

        let labels: Vec<&str> = top.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["b", "d"]);
    }

    #[test]
    fn test_excludes_non_positive_amounts() {
        let items = vec![("a", dec(0)), ("b", dec(-5)), ("c", dec(3))];

        let top = top_n(items, Some(5), |(_, amount)| *amount).unwrap();

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].0, "c");
    }

    #[test]
    fn test_ties_preserve_input_order() {
        let items = vec![("first", dec(7)), ("second", dec(7)), ("third", dec(7))];

        let top = top_n(items, Some(3), |(_, amount)| *amount).unwrap();

        let labels: Vec<&str> = top.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_defaults_to_five() {
        let items: Vec<(i32, Decimal)> = (1..=8).map(|i| (i, dec(i as i64))).collect();

        let top = top_n(items, None, |(_, amount)| *amount).unwrap();

        assert_eq!(top.len(), DEFAULT_TOP_N);
        assert_eq!(top[0].0, 8);
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let items = vec![(1, dec(1))];

        let err = top_n(items, Some(0), |(_, amount)| *amount).unwrap_err();

        assert!(matches!(err, ReportError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let items: Vec<(i32, Decimal)> = vec![];

        let top = top_n(items, None, |(_, amount)| *amount).unwrap();

        assert!(top.is_empty());
    }
}
