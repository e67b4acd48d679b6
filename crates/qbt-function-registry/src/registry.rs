use qbt_ir::{DataType, FunctionDesc};

use crate::builtin;

/// Resolves `(name, arg_types[])` to a [`FunctionDesc`] (§6, §9).
///
/// Matching is case-insensitive on name, exact on arity, and per-parameter:
/// a parameter matches when it equals the argument's type or is
/// `DataType::Any`.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: Vec<FunctionDesc>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self { functions: builtin::all_functions() }
    }

    pub fn with_functions(functions: Vec<FunctionDesc>) -> Self {
        Self { functions }
    }

    pub fn register(&mut self, desc: FunctionDesc) {
        self.functions.push(desc);
    }

    pub fn contains(&self, name: &str, arg_types: &[DataType]) -> bool {
        self.resolve(name, arg_types).is_some()
    }

    pub fn resolve(&self, name: &str, arg_types: &[DataType]) -> Option<&FunctionDesc> {
        self.functions.iter().find(|f| {
            f.name.eq_ignore_ascii_case(name)
                && f.param_types.len() == arg_types.len()
                && f.param_types
                    .iter()
                    .zip(arg_types)
                    .all(|(param, arg)| *param == DataType::Any || param == arg)
        })
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
