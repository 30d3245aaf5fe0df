//! Constant values and named constant definitions.

use crate::types::TypeRef;

/// A literal value from the IDL.
///
/// Values have already been checked against their declared type upstream;
/// the renderer trusts that a value fits its type.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// Integer literal, also used for bools and enum values.
    Integer(i64),
    /// Floating point literal.
    Double(f64),
    /// String literal.
    String(String),
    /// Reference to a named enum value.
    EnumRef {
        /// Value name.
        name: String,
        /// Resolved integer value.
        value: i64,
    },
    /// Map literal. For struct literals the keys are field names.
    Map(Vec<(ConstValue, ConstValue)>),
    /// List literal.
    List(Vec<ConstValue>),
    /// Set literal.
    Set(Vec<ConstValue>),
}

impl ConstValue {
    /// Shorthand for a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Builds a struct literal from `(field name, value)` pairs.
    #[must_use]
    pub fn struct_literal<N: Into<String>>(fields: impl IntoIterator<Item = (N, ConstValue)>) -> Self {
        Self::Map(
            fields
                .into_iter()
                .map(|(name, value)| (Self::String(name.into()), value))
                .collect(),
        )
    }

    /// Returns the integer payload of an integer or enum reference.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) | Self::EnumRef { value: v, .. } => Some(*v),
            _ => None,
        }
    }

    /// Returns the string payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value kind, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::EnumRef { .. } => "enum",
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::Set(_) => "set",
        }
    }
}

/// A named constant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDef {
    /// Constant name as written in the IDL.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Value.
    pub value: ConstValue,
    /// Documentation.
    pub doc: Option<String>,
}

impl ConstDef {
    /// Creates a named constant.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>, value: ConstValue) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            value,
            doc: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_literal_keys_are_strings() {
        let value = ConstValue::struct_literal([("x", ConstValue::Integer(1))]);
        let ConstValue::Map(pairs) = value else {
            panic!("expected map");
        };
        assert_eq!(pairs[0].0.as_str(), Some("x"));
        assert_eq!(pairs[0].1.as_integer(), Some(1));
    }

    #[test]
    fn test_enum_ref_integer() {
        let value = ConstValue::EnumRef {
            name: "ADD".to_string(),
            value: 1,
        };
        assert_eq!(value.as_integer(), Some(1));
        assert_eq!(value.kind(), "enum");
    }
}
