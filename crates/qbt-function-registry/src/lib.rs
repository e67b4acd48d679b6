//! Builtin SQL function signatures, resolved by `(name, arg_types)`.

mod builtin;
mod registry;

pub use qbt_ir::{DataType, FunctionDesc, FunctionType};
pub use registry::FunctionRegistry;
