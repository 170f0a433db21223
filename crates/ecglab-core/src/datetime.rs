//! Day-granularity time differences as polars expressions.

use polars::prelude::{DataType, Expr, lit, when};

const MICROS_PER_DAY: i64 = 86_400_000_000;

/// Whole days from `earlier` to `later`.
///
/// Floors toward negative infinity, so a -36 hour delta is -2 days. This is
/// the `timedelta.days` convention the downstream survival tooling expects.
/// Null when either operand is null.
pub fn day_diff(later: Expr, earlier: Expr) -> Expr {
    (later.cast(DataType::Int64) - earlier.cast(DataType::Int64)).floor_div(lit(MICROS_PER_DAY))
}

/// Clamp a day count at zero, passing nulls through.
pub fn clamp_non_negative(expr: Expr) -> Expr {
    when(expr.clone().lt(lit(0i64)))
        .then(lit(0i64))
        .otherwise(expr)
}
