//! Central type registry of the metadata model.
//!
//! The `TypeRegistry` owns every type of one assembly. It is the read-only metadata store
//! the attribute queries operate on: once populated through
//! [`crate::metadata::typesystem::TypeBuilder`] nothing in the query layer writes to it.
//!
//! # Registry Architecture
//!
//! The registry uses a multi-index approach for type lookup:
//!
//! - **Token-based lookup**: Primary index using metadata tokens, ordered, so iteration
//!   yields types in declaration order
//! - **Name-based lookup**: Secondary indices for full names, simple names, and namespaces
//!
//! # Thread Safety
//!
//! - Lock-free data structures for primary storage (`SkipMap`)
//! - Concurrent hash maps for indices and token allocation (`DashMap`)
//! - Atomic row counters per metadata table
//!
//! # Core Types
//!
//! Every registry is seeded with the imported core types `System.Object`,
//! `System.ValueType`, `System.Enum` and `System.Attribute`, which anchor the base chains
//! of declared classes, value types, enumerations and attribute classes.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};

use crate::{
    metadata::{
        token::{TableId, Token},
        typesystem::{CilFlavor, CilType, CilTypeRc, TypeAttributes, TypeSource},
    },
    Error, Result,
};

/// Name of the assembly the seeded core types are imported from
pub const CORE_ASSEMBLY: &str = "System.Runtime";

/// Direct handles to the seeded core types
struct CoreTypes {
    object: CilTypeRc,
    value_type: CilTypeRc,
    enumeration: CilTypeRc,
    attribute: CilTypeRc,
}

/// Represents a registry which holds all types of one assembly
pub struct TypeRegistry {
    /// Name of the assembly this registry describes
    assembly: String,
    /// Primary storage, ordered by token
    types: SkipMap<Token, CilTypeRc>,
    /// Next free row, per metadata table
    next_rows: DashMap<u8, AtomicU32>,
    /// Index: full name to token
    types_by_fullname: DashMap<String, Token>,
    /// Index: simple name to tokens
    types_by_name: DashMap<String, Vec<Token>>,
    /// Index: namespace to tokens
    types_by_namespace: DashMap<String, Vec<Token>>,
    /// Seeded core types
    core: CoreTypes,
}

impl TypeRegistry {
    /// Create a new registry for the assembly `assembly`, seeded with the core types
    ///
    /// ## Arguments
    /// * 'assembly' - Name of the assembly whose types this registry holds
    ///
    /// # Errors
    /// Returns [`Error::Empty`] for an empty assembly name.
    pub fn new(assembly: &str) -> Result<Self> {
        if assembly.is_empty() {
            return Err(Error::Empty);
        }

        let next_rows = DashMap::new();
        let allocate = |name: &str, base: Option<&CilTypeRc>, flags: TypeAttributes| {
            let row = next_rows
                .entry(TableId::TYPE_REF)
                .or_insert_with(|| AtomicU32::new(1))
                .fetch_add(1, Ordering::Relaxed);
            Arc::new(CilType::new(
                Token::from_parts(TableId::TYPE_REF, row),
                CilFlavor::Class,
                "System".to_string(),
                name.to_string(),
                TypeSource::External(CORE_ASSEMBLY.to_string()),
                base,
                flags,
            ))
        };

        let object = allocate("Object", None, TypeAttributes::PUBLIC);
        let value_type = allocate(
            "ValueType",
            Some(&object),
            TypeAttributes::PUBLIC | TypeAttributes::ABSTRACT,
        );
        let enumeration = allocate(
            "Enum",
            Some(&value_type),
            TypeAttributes::PUBLIC | TypeAttributes::ABSTRACT,
        );
        let attribute = allocate(
            "Attribute",
            Some(&object),
            TypeAttributes::PUBLIC | TypeAttributes::ABSTRACT,
        );

        let registry = TypeRegistry {
            assembly: assembly.to_string(),
            types: SkipMap::new(),
            next_rows,
            types_by_fullname: DashMap::new(),
            types_by_name: DashMap::new(),
            types_by_namespace: DashMap::new(),
            core: CoreTypes {
                object,
                value_type,
                enumeration,
                attribute,
            },
        };

        for core in [
            &registry.core.object,
            &registry.core.value_type,
            &registry.core.enumeration,
            &registry.core.attribute,
        ] {
            registry.insert(core)?;
        }

        Ok(registry)
    }

    /// Name of the assembly this registry describes
    pub fn assembly_name(&self) -> &str {
        &self.assembly
    }

    /// Allocate the next token of `table`
    ///
    /// Rows start at 1 and are unique per table within this registry until a table
    /// exceeds [`Token::MAX_ROW`] rows; past that the row saturates and a warning is logged.
    pub fn next_token(&self, table: u8) -> Token {
        let row = self
            .next_rows
            .entry(table)
            .or_insert_with(|| AtomicU32::new(1))
            .fetch_add(1, Ordering::Relaxed);
        if row > Token::MAX_ROW {
            tracing::warn!(table, row, "table rows exhausted, token saturated");
        }
        let token = Token::from_parts(table, row);
        tracing::trace!(%token, "allocated token");
        token
    }

    /// Insert a type into the registry
    ///
    /// ## Arguments
    /// * '`new_type`' - The type to register
    ///
    /// # Errors
    /// Returns [`Error::DuplicateType`] if the full name is taken, and
    /// [`Error::TypeInsert`] if the token is already in use.
    pub fn insert(&self, new_type: &CilTypeRc) -> Result<()> {
        let fullname = new_type.fullname();
        if self.types.contains_key(&new_type.token) {
            return Err(Error::TypeInsert(new_type.token));
        }

        match self.types_by_fullname.entry(fullname.clone()) {
            Entry::Occupied(_) => return Err(Error::DuplicateType(fullname)),
            Entry::Vacant(entry) => {
                entry.insert(new_type.token);
            }
        }

        self.types.insert(new_type.token, new_type.clone());
        self.types_by_name
            .entry(new_type.name.clone())
            .or_default()
            .push(new_type.token);
        self.types_by_namespace
            .entry(new_type.namespace.clone())
            .or_default()
            .push(new_type.token);

        tracing::trace!(token = %new_type.token, %fullname, "registered type");
        Ok(())
    }

    /// Get a type by its token
    pub fn get(&self, token: &Token) -> Option<CilTypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Returns true if `candidate` is the very type this registry holds under its token
    pub fn owns(&self, candidate: &CilTypeRc) -> bool {
        self.get(&candidate.token)
            .is_some_and(|registered| Arc::ptr_eq(&registered, candidate))
    }

    /// Get a type by its full name (`Namespace.Name`, `Outer+Nested`)
    pub fn get_by_fullname(&self, fullname: &str) -> Option<CilTypeRc> {
        let token = *self.types_by_fullname.get(fullname)?;
        self.get(&token)
    }

    /// Get all types with the simple name `name`
    pub fn get_by_name(&self, name: &str) -> Vec<CilTypeRc> {
        self.lookup_index(&self.types_by_name, name)
    }

    /// Get all types declared in `namespace`
    pub fn get_by_namespace(&self, namespace: &str) -> Vec<CilTypeRc> {
        self.lookup_index(&self.types_by_namespace, namespace)
    }

    fn lookup_index(&self, index: &DashMap<String, Vec<Token>>, key: &str) -> Vec<CilTypeRc> {
        index
            .get(key)
            .map(|tokens| tokens.iter().filter_map(|token| self.get(token)).collect())
            .unwrap_or_default()
    }

    /// `System.Object`
    pub fn object_type(&self) -> CilTypeRc {
        self.core.object.clone()
    }

    /// `System.ValueType`
    pub fn value_type_base(&self) -> CilTypeRc {
        self.core.value_type.clone()
    }

    /// `System.Enum`
    pub fn enum_base(&self) -> CilTypeRc {
        self.core.enumeration.clone()
    }

    /// `System.Attribute`
    pub fn attribute_type(&self) -> CilTypeRc {
        self.core.attribute.clone()
    }

    /// Number of registered types, core types included
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no type is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all registered types in token order
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, Token, CilTypeRc> {
        self.types.iter()
    }

    /// All registered types, core types included
    pub fn all_types(&self) -> Vec<CilTypeRc> {
        self.types.iter().map(|entry| entry.value().clone()).collect()
    }

    /// The types declared in this assembly, in declaration order
    pub fn defined_types(&self) -> impl Iterator<Item = CilTypeRc> + '_ {
        self.types
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|t| t.is_defined())
    }
}

impl<'a> IntoIterator for &'a TypeRegistry {
    type Item = crossbeam_skiplist::map::Entry<'a, Token, CilTypeRc>;
    type IntoIter = crossbeam_skiplist::map::Iter<'a, Token, CilTypeRc>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::TypeBuilder;

    #[test]
    fn test_registry_seeds_core_types() {
        let registry = TypeRegistry::new("Seeded").unwrap();

        assert_eq!(registry.assembly_name(), "Seeded");
        assert_eq!(registry.len(), 4);
        assert!(registry.defined_types().next().is_none());

        let attribute = registry.get_by_fullname("System.Attribute").unwrap();
        assert!(Arc::ptr_eq(&attribute, &registry.attribute_type()));
        assert_eq!(attribute.token.table(), TableId::TYPE_REF);
        assert_eq!(
            attribute.source,
            TypeSource::External(CORE_ASSEMBLY.to_string())
        );

        let chain: Vec<String> = registry
            .enum_base()
            .hierarchy()
            .map(|t| t.fullname())
            .collect();
        assert_eq!(chain, vec!["System.ValueType", "System.Object"]);
    }

    #[test]
    fn test_registry_rejects_empty_name() {
        assert!(matches!(TypeRegistry::new(""), Err(Error::Empty)));
    }

    #[test]
    fn test_next_token_per_table() {
        let registry = TypeRegistry::new("Tokens").unwrap();

        let first = registry.next_token(TableId::FIELD);
        let second = registry.next_token(TableId::FIELD);
        let method = registry.next_token(TableId::METHOD_DEF);

        assert_eq!(first, Token::from_parts(TableId::FIELD, 1));
        assert_eq!(second, Token::from_parts(TableId::FIELD, 2));
        assert_eq!(method, Token::from_parts(TableId::METHOD_DEF, 1));
        assert_eq!(
            registry.next_token(TableId::TYPE_REF),
            Token::from_parts(TableId::TYPE_REF, 5)
        );
    }

    #[test]
    fn test_next_token_saturates() {
        let registry = TypeRegistry::new("Tokens").unwrap();
        registry
            .next_rows
            .insert(TableId::FIELD, AtomicU32::new(Token::MAX_ROW));

        let last = registry.next_token(TableId::FIELD);
        let overflow = registry.next_token(TableId::FIELD);

        assert_eq!(last.row(), Token::MAX_ROW);
        assert_eq!(overflow.row(), Token::MAX_ROW);
        assert_eq!(overflow.table(), TableId::FIELD);
    }

    #[test]
    fn test_lookup_indices() {
        let registry = TypeRegistry::new("Lookup").unwrap();
        let circle = TypeBuilder::new(&registry)
            .class("Geometry", "Circle")
            .build()
            .unwrap();
        TypeBuilder::new(&registry)
            .class("Geometry", "Square")
            .build()
            .unwrap();
        TypeBuilder::new(&registry)
            .class("Drawing", "Circle")
            .build()
            .unwrap();

        assert_eq!(registry.get_by_name("Circle").len(), 2);
        assert_eq!(registry.get_by_namespace("Geometry").len(), 2);
        assert!(registry.get_by_namespace("Missing").is_empty());
        assert!(registry.owns(&circle));
        assert!(Arc::ptr_eq(
            &registry.get(&circle.token).unwrap(),
            &registry.get_by_fullname("Geometry.Circle").unwrap()
        ));

        let declared: Vec<String> = registry.defined_types().map(|t| t.fullname()).collect();
        assert_eq!(
            declared,
            vec!["Geometry.Circle", "Geometry.Square", "Drawing.Circle"]
        );
        assert_eq!(registry.all_types().len(), 7);
        assert_eq!((&registry).into_iter().count(), 7);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let registry = TypeRegistry::new("Duplicates").unwrap();
        let object = registry.object_type();

        assert!(matches!(
            registry.insert(&object),
            Err(Error::TypeInsert(token)) if token == object.token
        ));

        let clash = Arc::new(CilType::new(
            registry.next_token(TableId::TYPE_DEF),
            CilFlavor::Class,
            "System".to_string(),
            "Object".to_string(),
            TypeSource::CurrentModule,
            None,
            TypeAttributes::PUBLIC,
        ));
        assert!(matches!(
            registry.insert(&clash),
            Err(Error::DuplicateType(name)) if name == "System.Object"
        ));
        assert!(!registry.owns(&clash));
    }
}
