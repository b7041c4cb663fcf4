//! Assemblies: named containers of types.
//!
//! An [`Assembly`] owns the [`TypeRegistry`] its types are declared in. Its type
//! enumeration lists the types declared by the assembly itself, in declaration order; the
//! core types imported from `System.Runtime` are reachable through the registry but are
//! not part of the assembly.

use std::sync::Arc;

use crate::{
    metadata::{
        query::TypeQuery,
        typesystem::{CilTypeRc, TypeRegistry},
    },
    Result,
};

/// A named assembly and the registry holding its types
///
/// Cloning is cheap, clones share the registry.
#[derive(Clone)]
pub struct Assembly {
    registry: Arc<TypeRegistry>,
}

impl Assembly {
    /// Create an empty assembly named `name`
    ///
    /// ## Arguments
    /// * 'name' - Name of the assembly
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for an empty name.
    pub fn new(name: &str) -> Result<Self> {
        Ok(Assembly {
            registry: Arc::new(TypeRegistry::new(name)?),
        })
    }

    /// Name of this assembly
    pub fn name(&self) -> &str {
        self.registry.assembly_name()
    }

    /// The registry holding the types of this assembly
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The types declared by this assembly, in declaration order
    pub fn types(&self) -> impl Iterator<Item = CilTypeRc> + '_ {
        self.registry.defined_types()
    }

    /// Start a [`TypeQuery`] over every type of the registry
    ///
    /// Core types are included; chain [`TypeQuery::defined`] to restrict the query to the
    /// types declared by this assembly.
    #[must_use]
    pub fn query_types(&self) -> TypeQuery<'_> {
        TypeQuery::new(&self.registry)
    }

    /// Look up a type declared by this assembly by its full name
    pub fn get_type(&self, fullname: &str) -> Option<CilTypeRc> {
        self.registry
            .get_by_fullname(fullname)
            .filter(|found| found.is_defined())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::typesystem::TypeBuilder, Error};

    #[test]
    fn test_assembly_types() {
        let assembly = Assembly::new("Shop").unwrap();
        assert_eq!(assembly.name(), "Shop");
        assert_eq!(assembly.types().count(), 0);

        TypeBuilder::new(assembly.registry())
            .class("Shop", "Order")
            .build()
            .unwrap();
        TypeBuilder::new(assembly.registry())
            .class("Shop", "Invoice")
            .build()
            .unwrap();

        let names: Vec<String> = assembly.types().map(|t| t.fullname()).collect();
        assert_eq!(names, vec!["Shop.Order", "Shop.Invoice"]);
        assert!(assembly.get_type("Shop.Invoice").is_some());
        assert!(assembly.get_type("System.Object").is_none());
        assert!(assembly.registry().get_by_fullname("System.Object").is_some());

        let shared = assembly.clone();
        assert_eq!(shared.types().count(), 2);
    }

    #[test]
    fn test_assembly_requires_name() {
        assert!(matches!(Assembly::new(""), Err(Error::Empty)));
    }
}
