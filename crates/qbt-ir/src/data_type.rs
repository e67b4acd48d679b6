use serde::{Deserialize, Serialize};

/// The fixed set of scalar types the Datum/Type system exposes.
///
/// `Any` is not a real column type; it exists only as a function parameter
/// wildcard (§9: "`ANY` acts as a wildcard parameter type for built-ins
/// like `count`").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    Text,
    Bytes,
    Ipv4,
    Any,
}

impl DataType {
    /// Parse a CREATE TABLE schema type token (§4.9).
    ///
    /// Accepts `BOOL`, `BYTE`, `INT`, `LONG`, `FLOAT`, `DOUBLE`,
    /// `TEXT`/`STRING`, `BYTES`, `IPV4`. Case-insensitive. Returns `None` for
    /// any other token, which callers turn into `InvalidQuery`.
    pub fn parse_schema_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "BOOL" => Some(DataType::Bool),
            "BYTE" => Some(DataType::Byte),
            "SHORT" => Some(DataType::Short),
            "INT" => Some(DataType::Int),
            "LONG" => Some(DataType::Long),
            "FLOAT" => Some(DataType::Float),
            "DOUBLE" => Some(DataType::Double),
            "CHAR" => Some(DataType::Char),
            "TEXT" | "STRING" => Some(DataType::Text),
            "BYTES" => Some(DataType::Bytes),
            "IPV4" | "IPV4ADDR" => Some(DataType::Ipv4),
            _ => None,
        }
    }

    fn numeric_rank(self) -> Option<u8> {
        match self {
            DataType::Byte => Some(0),
            DataType::Short => Some(1),
            DataType::Int => Some(2),
            DataType::Long => Some(3),
            DataType::Float => Some(10),
            DataType::Double => Some(11),
            _ => None,
        }
    }

    /// Widen two operand types for a `Binary` arithmetic/comparison result
    /// (§C.1 of the expanded spec). Non-numeric mixes keep `self`.
    pub fn promote(self, other: DataType) -> DataType {
        let (Some(a), Some(b)) = (self.numeric_rank(), other.numeric_rank()) else {
            return self;
        };
        let is_float = |r: u8| r >= 10;
        match (is_float(a), is_float(b)) {
            (false, false) => if a >= b { self } else { other },
            (true, true) => if a >= b { self } else { other },
            _ => DataType::Double,
        }
    }
}
