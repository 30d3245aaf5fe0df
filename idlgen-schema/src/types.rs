//! Type references and named type definitions.
//!
//! Named definitions are shared through [`Arc`], so a [`TypeRef`] can only
//! point at definitions that already exist. Typedef chains are therefore
//! acyclic by construction and always resolve.

use std::fmt;
use std::sync::Arc;

use crate::structs::StructDef;

/// Where a named definition lives: its program and that program's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    /// Program name, used for artifact file names.
    pub program: String,
    /// Dotted namespace, possibly empty.
    pub namespace: String,
}

impl Scope {
    /// Creates a shared scope.
    #[must_use]
    pub fn new(program: impl Into<String>, namespace: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            program: program.into(),
            namespace: namespace.into(),
        })
    }
}

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// No value; only valid as a function return type.
    Void,
    /// UTF-8 string.
    String,
    /// Raw byte string.
    Binary,
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// 64-bit float.
    Double,
}

impl BaseType {
    /// Returns the IDL spelling of this kind.
    #[must_use]
    pub const fn idl_name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::String => "string",
            Self::Binary => "binary",
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Double => "double",
        }
    }
}

/// One named value of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Value name as written in the IDL.
    pub name: String,
    /// Integer value carried on the wire.
    pub value: i32,
}

/// An enum definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    /// Defining scope.
    pub scope: Arc<Scope>,
    /// Enum name.
    pub name: String,
    /// Values in declaration order.
    pub values: Vec<EnumValue>,
    /// Documentation.
    pub doc: Option<String>,
}

impl EnumDef {
    /// Creates an enum from `(name, value)` pairs.
    #[must_use]
    pub fn new<N: Into<String>>(
        scope: &Arc<Scope>,
        name: impl Into<String>,
        values: impl IntoIterator<Item = (N, i32)>,
    ) -> Self {
        Self {
            scope: Arc::clone(scope),
            name: name.into(),
            values: values
                .into_iter()
                .map(|(name, value)| EnumValue {
                    name: name.into(),
                    value,
                })
                .collect(),
            doc: None,
        }
    }

    /// Attaches documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Looks up a value by name.
    #[must_use]
    pub fn value_by_name(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// A typedef: a new name for an existing type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDef {
    /// Defining scope.
    pub scope: Arc<Scope>,
    /// Alias name.
    pub name: String,
    /// Aliased type, possibly another typedef.
    pub target: TypeRef,
    /// Documentation.
    pub doc: Option<String>,
}

impl TypedefDef {
    /// Creates a typedef.
    #[must_use]
    pub fn new(scope: &Arc<Scope>, name: impl Into<String>, target: impl Into<TypeRef>) -> Self {
        Self {
            scope: Arc::clone(scope),
            name: name.into(),
            target: target.into(),
            doc: None,
        }
    }

    /// Attaches documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Reference to a type from a field, argument, return value or constant.
#[derive(Debug, Clone)]
pub enum TypeRef {
    /// Built-in scalar kind.
    Base(BaseType),
    /// Enum definition.
    Enum(Arc<EnumDef>),
    /// Struct or exception definition.
    Struct(Arc<StructDef>),
    /// Typedef, resolved through [`crate::resolve`].
    Typedef(Arc<TypedefDef>),
    /// `list<T>`.
    List(Box<TypeRef>),
    /// `set<T>`.
    Set(Box<TypeRef>),
    /// `map<K, V>`.
    Map(Box<TypeRef>, Box<TypeRef>),
}

impl TypeRef {
    /// Shorthand for `list<elem>`.
    #[must_use]
    pub fn list(elem: impl Into<TypeRef>) -> Self {
        Self::List(Box::new(elem.into()))
    }

    /// Shorthand for `set<elem>`.
    #[must_use]
    pub fn set(elem: impl Into<TypeRef>) -> Self {
        Self::Set(Box::new(elem.into()))
    }

    /// Shorthand for `map<key, value>`.
    #[must_use]
    pub fn map(key: impl Into<TypeRef>, value: impl Into<TypeRef>) -> Self {
        Self::Map(Box::new(key.into()), Box::new(value.into()))
    }

    /// Returns true for `void`, looking through typedefs.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(crate::resolve(self), Self::Base(BaseType::Void))
    }

    /// Returns the defining scope of a named type.
    #[must_use]
    pub fn scope(&self) -> Option<&Arc<Scope>> {
        match self {
            Self::Enum(e) => Some(&e.scope),
            Self::Struct(s) => Some(&s.scope),
            Self::Typedef(t) => Some(&t.scope),
            Self::Base(_) | Self::List(_) | Self::Set(_) | Self::Map(_, _) => None,
        }
    }
}

impl From<BaseType> for TypeRef {
    fn from(base: BaseType) -> Self {
        Self::Base(base)
    }
}

impl From<Arc<EnumDef>> for TypeRef {
    fn from(def: Arc<EnumDef>) -> Self {
        Self::Enum(def)
    }
}

impl From<Arc<StructDef>> for TypeRef {
    fn from(def: Arc<StructDef>) -> Self {
        Self::Struct(def)
    }
}

impl From<Arc<TypedefDef>> for TypeRef {
    fn from(def: Arc<TypedefDef>) -> Self {
        Self::Typedef(def)
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Base(a), Self::Base(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => {
                Arc::ptr_eq(a, b) || (a.scope == b.scope && a.name == b.name)
            }
            (Self::Struct(a), Self::Struct(b)) => {
                Arc::ptr_eq(a, b) || (a.scope == b.scope && a.name == b.name)
            }
            (Self::Typedef(a), Self::Typedef(b)) => {
                Arc::ptr_eq(a, b) || (a.scope == b.scope && a.name == b.name)
            }
            (Self::List(a), Self::List(b)) | (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(ka, va), Self::Map(kb, vb)) => ka == kb && va == vb,
            _ => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(base) => f.write_str(base.idl_name()),
            Self::Enum(def) => f.write_str(&def.name),
            Self::Struct(def) => f.write_str(&def.name),
            Self::Typedef(def) => f.write_str(&def.name),
            Self::List(elem) => write!(f, "list<{elem}>"),
            Self::Set(elem) => write!(f, "set<{elem}>"),
            Self::Map(key, value) => write!(f, "map<{key}, {value}>"),
        }
    }
}
