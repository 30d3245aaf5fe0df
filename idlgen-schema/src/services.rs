//! Service and function definitions.

use std::sync::Arc;

use crate::structs::{Field, StructDef};
use crate::types::{BaseType, Scope, TypeRef};

/// A remote procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Function name.
    pub name: String,
    /// Return type, `void` for none.
    pub return_type: TypeRef,
    /// Synthetic struct holding the arguments.
    pub arguments: StructDef,
    /// Synthetic struct listing the declared exceptions.
    pub exceptions: StructDef,
    /// One-way functions get no response.
    pub oneway: bool,
    /// Documentation.
    pub doc: Option<String>,
}

impl FunctionDef {
    /// Creates a function without arguments.
    #[must_use]
    pub fn new(scope: &Arc<Scope>, name: impl Into<String>, return_type: impl Into<TypeRef>) -> Self {
        let name = name.into();
        Self {
            arguments: StructDef::new(scope, format!("{name}_args")),
            exceptions: StructDef::new(scope, format!("{name}_throws")),
            name,
            return_type: return_type.into(),
            oneway: false,
            doc: None,
        }
    }

    /// Creates a one-way function.
    #[must_use]
    pub fn oneway(scope: &Arc<Scope>, name: impl Into<String>) -> Self {
        Self {
            oneway: true,
            ..Self::new(scope, name, BaseType::Void)
        }
    }

    /// Appends an argument.
    #[must_use]
    pub fn with_arg(mut self, field: Field) -> Self {
        self.arguments.fields.push(field);
        self
    }

    /// Appends a declared exception.
    #[must_use]
    pub fn with_throws(mut self, field: Field) -> Self {
        self.exceptions.fields.push(field);
        self
    }

    /// Attaches documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Returns true if the function returns nothing.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.return_type.is_void()
    }
}

/// A service: an ordered set of functions with an optional parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDef {
    /// Defining scope.
    pub scope: Arc<Scope>,
    /// Service name.
    pub name: String,
    /// Parent service whose functions this one inherits.
    pub extends: Option<Arc<ServiceDef>>,
    /// Functions in declaration order.
    pub functions: Vec<FunctionDef>,
    /// Documentation.
    pub doc: Option<String>,
}

impl ServiceDef {
    /// Creates an empty service.
    #[must_use]
    pub fn new(scope: &Arc<Scope>, name: impl Into<String>) -> Self {
        Self {
            scope: Arc::clone(scope),
            name: name.into(),
            extends: None,
            functions: Vec::new(),
            doc: None,
        }
    }

    /// Sets the parent service.
    #[must_use]
    pub fn extending(mut self, parent: &Arc<ServiceDef>) -> Self {
        self.extends = Some(Arc::clone(parent));
        self
    }

    /// Appends a function.
    #[must_use]
    pub fn with_function(mut self, function: FunctionDef) -> Self {
        self.functions.push(function);
        self
    }

    /// Attaches documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Parent chain, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Arc<ServiceDef>> {
        std::iter::successors(self.extends.as_ref(), |s| s.extends.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_shapes() {
        let scope = Scope::new("p", "");
        let add = FunctionDef::new(&scope, "add", BaseType::I32)
            .with_arg(Field::new(1, "num1", BaseType::I32))
            .with_arg(Field::new(2, "num2", BaseType::I32));
        assert!(!add.is_void());
        assert!(!add.oneway);
        assert_eq!(add.arguments.fields.len(), 2);
        assert_eq!(add.arguments.name, "add_args");

        let zip = FunctionDef::oneway(&scope, "zip");
        assert!(zip.is_void());
        assert!(zip.oneway);
    }

    #[test]
    fn test_ancestors() {
        let scope = Scope::new("p", "");
        let root = Arc::new(ServiceDef::new(&scope, "Root"));
        let middle = Arc::new(ServiceDef::new(&scope, "Middle").extending(&root));
        let leaf = ServiceDef::new(&scope, "Leaf").extending(&middle);
        let names: Vec<&str> = leaf.ancestors().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Middle", "Root"]);
        assert_eq!(root.ancestors().count(), 0);
    }
}
