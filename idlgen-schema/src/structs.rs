//! Struct, exception and field definitions.

use std::sync::Arc;

use crate::constants::ConstValue;
use crate::types::{Scope, TypeRef};

/// Whether a field must be present on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requiredness {
    /// Must be present; absence fails the decode. No presence flag.
    Required,
    /// May be absent; tracked by a presence flag.
    Optional,
    /// Neither keyword given; tracked by a presence flag.
    Default,
}

impl Requiredness {
    /// Returns true if the field carries a runtime presence flag.
    #[must_use]
    pub const fn has_presence_flag(self) -> bool {
        !matches!(self, Self::Required)
    }
}

/// A field of a struct, exception or argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Wire id, unique within the owner.
    pub id: i16,
    /// Field name as written in the IDL.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Requiredness.
    pub requiredness: Requiredness,
    /// Declared default value.
    pub default: Option<ConstValue>,
    /// Documentation.
    pub doc: Option<String>,
}

impl Field {
    /// Creates a field with default requiredness.
    #[must_use]
    pub fn new(id: i16, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            id,
            name: name.into(),
            ty: ty.into(),
            requiredness: Requiredness::Default,
            default: None,
            doc: None,
        }
    }

    /// Marks the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.requiredness = Requiredness::Required;
        self
    }

    /// Marks the field optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.requiredness = Requiredness::Optional;
        self
    }

    /// Sets the declared default value.
    #[must_use]
    pub fn with_default(mut self, value: ConstValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Attaches documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Returns true if the field carries a runtime presence flag.
    #[must_use]
    pub fn has_presence_flag(&self) -> bool {
        self.requiredness.has_presence_flag()
    }
}

/// A struct or exception definition.
///
/// Also used for the synthetic argument and exception lists of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    /// Defining scope.
    pub scope: Arc<Scope>,
    /// Struct name.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    /// Exception marker.
    pub is_exception: bool,
    /// Documentation.
    pub doc: Option<String>,
}

impl StructDef {
    /// Creates an empty struct.
    #[must_use]
    pub fn new(scope: &Arc<Scope>, name: impl Into<String>) -> Self {
        Self {
            scope: Arc::clone(scope),
            name: name.into(),
            fields: Vec::new(),
            is_exception: false,
            doc: None,
        }
    }

    /// Creates an empty exception.
    #[must_use]
    pub fn exception(scope: &Arc<Scope>, name: impl Into<String>) -> Self {
        Self {
            is_exception: true,
            ..Self::new(scope, name)
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Attaches documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Fields ordered by ascending id, the order used for encoding.
    #[must_use]
    pub fn sorted_fields(&self) -> Vec<&Field> {
        let mut sorted: Vec<&Field> = self.fields.iter().collect();
        sorted.sort_by_key(|f| f.id);
        sorted
    }

    /// Looks up a field by its IDL name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if any field carries a presence flag.
    #[must_use]
    pub fn has_presence_flags(&self) -> bool {
        self.fields.iter().any(Field::has_presence_flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BaseType;

    #[test]
    fn test_sorted_fields() {
        let scope = Scope::new("p", "");
        let def = StructDef::new(&scope, "Shuffled")
            .with_field(Field::new(5, "e", BaseType::I32))
            .with_field(Field::new(1, "a", BaseType::I32))
            .with_field(Field::new(3, "c", BaseType::I32));
        let ids: Vec<i16> = def.sorted_fields().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        let declared: Vec<i16> = def.fields.iter().map(|f| f.id).collect();
        assert_eq!(declared, vec![5, 1, 3]);
    }

    #[test]
    fn test_presence_flags() {
        let scope = Scope::new("p", "");
        let only_required = StructDef::new(&scope, "R")
            .with_field(Field::new(1, "id", BaseType::I32).required());
        assert!(!only_required.has_presence_flags());

        let mixed = only_required
            .clone()
            .with_field(Field::new(2, "name", BaseType::String).optional());
        assert!(mixed.has_presence_flags());
        assert!(mixed.field_by_name("name").is_some_and(Field::has_presence_flag));
        assert!(!mixed.field_by_name("id").is_some_and(Field::has_presence_flag));
    }

    #[test]
    fn test_exception_marker() {
        let scope = Scope::new("p", "");
        assert!(StructDef::exception(&scope, "Oops").is_exception);
        assert!(!StructDef::new(&scope, "Fine").is_exception);
    }
}
