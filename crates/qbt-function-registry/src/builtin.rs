//! Builtin function signatures.
//!
//! Grounded in the same aggregate/scalar split a MySQL builtin table would
//! use, but — unlike a hover-text registry — every entry here carries
//! concrete parameter types so `(name, arg_types)` resolution (§4.11, §9)
//! has something to match against. Overload resolution is by exact arity and
//! per-parameter type equality, with `DataType::Any` acting as a wildcard.

use qbt_ir::{DataType, FunctionDesc, FunctionType};

pub fn all_functions() -> Vec<FunctionDesc> {
    use DataType::*;
    use FunctionType::{Agg, General};

    vec![
        // Aggregates. COUNT has two shapes: COUNT(*) (zero arity, dispatched
        // from the dedicated COUNT_ROWS AST kind) and COUNT(expr) (one ANY
        // arg, dispatched from COUNT_VAL).
        FunctionDesc::new("count", Agg, vec![], Long),
        FunctionDesc::new("count", Agg, vec![Any], Long),
        FunctionDesc::new("sum", Agg, vec![Any], Double),
        FunctionDesc::new("avg", Agg, vec![Any], Double),
        FunctionDesc::new("min", Agg, vec![Any], Any),
        FunctionDesc::new("max", Agg, vec![Any], Any),
        // Scalars.
        FunctionDesc::new("abs", General, vec![Int], Int),
        FunctionDesc::new("abs", General, vec![Long], Long),
        FunctionDesc::new("abs", General, vec![Double], Double),
        FunctionDesc::new("ceil", General, vec![Double], Int),
        FunctionDesc::new("floor", General, vec![Double], Int),
        FunctionDesc::new("round", General, vec![Double], Double),
        FunctionDesc::new("upper", General, vec![Text], Text),
        FunctionDesc::new("lower", General, vec![Text], Text),
        FunctionDesc::new("length", General, vec![Text], Int),
        FunctionDesc::new("trim", General, vec![Text], Text),
        FunctionDesc::new("concat", General, vec![Text, Text], Text),
        FunctionDesc::new("coalesce", General, vec![Any, Any], Any),
    ]
}
