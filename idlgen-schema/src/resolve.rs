//! Type resolution.
//!
//! Generators never look at a [`TypeRef`] directly: they strip typedefs with
//! [`resolve`] and branch on the resulting [`TypeClass`].

use idlgen_core::FieldType;

use crate::types::{BaseType, TypeRef};

/// Coarse classification of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    /// Built-in scalar other than void.
    Base,
    /// Enum.
    Enum,
    /// Struct or exception.
    Struct,
    /// List, set or map.
    Container,
    /// `void`.
    Void,
}

/// Strips every level of typedef indirection.
///
/// Terminates because typedefs can only point at definitions that already
/// existed when they were created.
#[must_use]
pub fn resolve(ty: &TypeRef) -> &TypeRef {
    let mut current = ty;
    while let TypeRef::Typedef(def) = current {
        current = &def.target;
    }
    current
}

/// Classifies a type after resolving typedefs.
#[must_use]
pub fn classify(ty: &TypeRef) -> TypeClass {
    match resolve(ty) {
        TypeRef::Base(BaseType::Void) => TypeClass::Void,
        TypeRef::Base(_) => TypeClass::Base,
        TypeRef::Enum(_) => TypeClass::Enum,
        TypeRef::Struct(_) => TypeClass::Struct,
        TypeRef::List(_) | TypeRef::Set(_) | TypeRef::Map(_, _) => TypeClass::Container,
        TypeRef::Typedef(def) => classify(&def.target),
    }
}

/// Returns the wire type tag a field of this type is encoded with.
///
/// Enums travel as `I32`, binary as `String`; `void` has no tag.
#[must_use]
pub fn wire_type(ty: &TypeRef) -> Option<FieldType> {
    let tag = match resolve(ty) {
        TypeRef::Base(base) => match base {
            BaseType::Void => return None,
            BaseType::String | BaseType::Binary => FieldType::String,
            BaseType::Bool => FieldType::Bool,
            BaseType::Byte => FieldType::Byte,
            BaseType::I16 => FieldType::I16,
            BaseType::I32 => FieldType::I32,
            BaseType::I64 => FieldType::I64,
            BaseType::Double => FieldType::Double,
        },
        TypeRef::Enum(_) => FieldType::I32,
        TypeRef::Struct(_) => FieldType::Struct,
        TypeRef::List(_) => FieldType::List,
        TypeRef::Set(_) => FieldType::Set,
        TypeRef::Map(_, _) => FieldType::Map,
        TypeRef::Typedef(def) => return wire_type(&def.target),
    };
    Some(tag)
}

impl TypeRef {
    /// See [`resolve`].
    #[must_use]
    pub fn resolved(&self) -> &TypeRef {
        resolve(self)
    }

    /// See [`classify`].
    #[must_use]
    pub fn class(&self) -> TypeClass {
        classify(self)
    }

    /// See [`wire_type`].
    #[must_use]
    pub fn wire_type(&self) -> Option<FieldType> {
        wire_type(self)
    }
}
