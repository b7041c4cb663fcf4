//! Composable type queries.
//!
//! A [`TypeQuery`] accumulates filter predicates over the types of a registry, attribute
//! filters included, and runs them lazily when iterated. The type collectors of
//! [`crate::metadata::assembly::Assembly`] are built on it.
//!
//! # Examples
//!
//! ```rust
//! use attrscope::prelude::*;
//!
//! let assembly = Assembly::new("Plugins")?;
//! let exported = TypeBuilder::new(assembly.registry())
//!     .attribute_class("Plugins", "ExportedAttribute")
//!     .build()?;
//! TypeBuilder::new(assembly.registry())
//!     .class("Plugins", "Loader")
//!     .public()
//!     .attribute(&exported)
//!     .build()?;
//!
//! let loaders = assembly
//!     .query_types()
//!     .defined()
//!     .public()
//!     .with_attribute(&exported)
//!     .find_all();
//! assert_eq!(loaders.len(), 1);
//! # Ok::<(), attrscope::Error>(())
//! ```

use crossbeam_skiplist::map;

use crate::metadata::{
    customattributes::AttributeType,
    query::AttributePredicates,
    token::Token,
    typesystem::{CilType, CilTypeRc, TypeRegistry},
};

/// A boxed filter predicate over [`CilType`] references.
type TypeFilter<'a> = Box<dyn Fn(&CilType) -> bool + 'a>;

/// A composable query builder for filtering the types of a registry.
///
/// Each fluent method consumes and returns `Self`. Terminal methods like
/// [`TypeQuery::find_all`] execute the query; consuming the query with `into_iter` yields
/// the matches lazily, in token order.
pub struct TypeQuery<'a> {
    registry: &'a TypeRegistry,
    filters: Vec<TypeFilter<'a>>,
}

impl<'a> TypeQuery<'a> {
    /// Creates a new `TypeQuery` over every type of `registry`, core types included.
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            filters: Vec::new(),
        }
    }

    /// Filters to types declared in the assembly (excludes the imported core types).
    #[must_use]
    pub fn defined(mut self) -> Self {
        self.filters.push(Box::new(CilType::is_defined));
        self
    }

    /// Filters to enumerations.
    #[must_use]
    pub fn enums(mut self) -> Self {
        self.filters.push(Box::new(CilType::is_enum));
        self
    }

    /// Filters to interfaces.
    #[must_use]
    pub fn interfaces(mut self) -> Self {
        self.filters.push(Box::new(CilType::is_interface));
        self
    }

    /// Filters to attribute classes.
    #[must_use]
    pub fn attribute_classes(mut self) -> Self {
        self.filters.push(Box::new(CilType::is_attribute));
        self
    }

    /// Filters to publicly visible types.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.filters.push(Box::new(CilType::is_public));
        self
    }

    /// Filters to sealed types.
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.filters.push(Box::new(CilType::is_sealed));
        self
    }

    /// Filters to abstract types.
    #[must_use]
    pub fn abstract_types(mut self) -> Self {
        self.filters.push(Box::new(CilType::is_abstract));
        self
    }

    /// Filters to types in the exact namespace.
    #[must_use]
    pub fn namespace(mut self, ns: &'a str) -> Self {
        self.filters.push(Box::new(move |t| t.namespace == ns));
        self
    }

    /// Filters to types with the exact name.
    #[must_use]
    pub fn name(mut self, name: &'a str) -> Self {
        self.filters.push(Box::new(move |t| t.name == name));
        self
    }

    /// Filters to nested types.
    #[must_use]
    pub fn nested(mut self) -> Self {
        self.filters.push(Box::new(|t| t.enclosing_type().is_some()));
        self
    }

    /// Filters to types deriving from `base`, directly or indirectly.
    #[must_use]
    pub fn subclasses_of(mut self, base: &'a CilTypeRc) -> Self {
        self.filters.push(Box::new(move |t| t.is_subclass_of(base)));
        self
    }

    /// Filters to types carrying an attribute of class `kind` (or derived from it).
    #[must_use]
    pub fn with_attribute(mut self, kind: &'a CilTypeRc) -> Self {
        self.filters
            .push(Box::new(move |t| t.has_custom_attribute(kind)));
        self
    }

    /// Filters to types carrying an attribute of class `K::FULLNAME` (or derived from it).
    #[must_use]
    pub fn with_attribute_of<K: AttributeType + 'a>(mut self) -> Self {
        self.filters
            .push(Box::new(|t| t.has_custom_attribute_of::<K>()));
        self
    }

    /// Filters to types carrying an attribute matching any of `kinds`.
    ///
    /// An empty `kinds` keeps every type carrying at least one attribute.
    #[must_use]
    pub fn with_any_attribute(mut self, kinds: &'a [CilTypeRc]) -> Self {
        self.filters
            .push(Box::new(move |t| t.has_any_custom_attribute(kinds)));
        self
    }

    /// Filters to types carrying attributes matching every one of `kinds`.
    #[must_use]
    pub fn with_all_attributes(mut self, kinds: &'a [CilTypeRc]) -> Self {
        self.filters
            .push(Box::new(move |t| t.has_all_custom_attributes(kinds)));
        self
    }

    /// Applies a custom filter predicate.
    #[must_use]
    pub fn filter(mut self, f: impl Fn(&CilType) -> bool + 'a) -> Self {
        self.filters.push(Box::new(f));
        self
    }

    /// Returns all matching types.
    #[must_use]
    pub fn find_all(&self) -> Vec<CilTypeRc> {
        self.iter().collect()
    }

    /// Returns the first matching type, short-circuiting iteration.
    #[must_use]
    pub fn find_first(&self) -> Option<CilTypeRc> {
        self.iter().next()
    }

    /// Returns the count of matching types.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if any type matches (short-circuits).
    #[must_use]
    pub fn exists(&self) -> bool {
        self.iter().next().is_some()
    }

    /// Returns just the tokens of matching types.
    #[must_use]
    pub fn tokens(&self) -> Vec<Token> {
        self.iter().map(|t| t.token).collect()
    }

    /// Returns a lazy iterator over matching types.
    pub fn iter(&self) -> impl Iterator<Item = CilTypeRc> + '_ {
        self.registry.iter().filter_map(move |entry| {
            let t = entry.value();
            if matches_all(&self.filters, t) {
                Some(t.clone())
            } else {
                None
            }
        })
    }
}

fn matches_all(filters: &[TypeFilter<'_>], candidate: &CilType) -> bool {
    filters.iter().all(|f| f(candidate))
}

/// Owning iterator over the matches of a [`TypeQuery`]
pub struct TypeQueryIter<'a> {
    entries: map::Iter<'a, Token, CilTypeRc>,
    filters: Vec<TypeFilter<'a>>,
}

impl Iterator for TypeQueryIter<'_> {
    type Item = CilTypeRc;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.entries.by_ref() {
            if matches_all(&self.filters, entry.value()) {
                return Some(entry.value().clone());
            }
        }
        None
    }
}

impl<'a> IntoIterator for TypeQuery<'a> {
    type Item = CilTypeRc;
    type IntoIter = TypeQueryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        TypeQueryIter {
            entries: self.registry.iter(),
            filters: self.filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        assembly::Assembly, customattributes::CustomAttributeRc, typesystem::TypeBuilder,
    };

    struct Exported;

    impl AttributeType for Exported {
        const FULLNAME: &'static str = "Plugins.ExportedAttribute";

        fn from_attribute(_attribute: &CustomAttributeRc) -> Self {
            Exported
        }
    }

    fn plugins() -> Assembly {
        let assembly = Assembly::new("Plugins").unwrap();
        let registry = assembly.registry();

        let exported = TypeBuilder::new(registry)
            .attribute_class("Plugins", "ExportedAttribute")
            .public()
            .build()
            .unwrap();
        let internal = TypeBuilder::new(registry)
            .attribute_class("Plugins", "InternalAttribute")
            .build()
            .unwrap();
        TypeBuilder::new(registry)
            .class("Plugins", "Loader")
            .public()
            .attribute(&exported)
            .build()
            .unwrap();
        TypeBuilder::new(registry)
            .class("Plugins.Detail", "Cache")
            .attribute(&exported)
            .attribute(&internal)
            .build()
            .unwrap();
        TypeBuilder::new(registry)
            .enumeration("Plugins", "Mode")
            .public()
            .build()
            .unwrap();
        assembly
    }

    fn names(query: TypeQuery<'_>) -> Vec<String> {
        query.into_iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn test_type_query_defined_filters_core_types() {
        let assembly = plugins();

        let all_types = assembly.registry().all_types();
        let defined_types = assembly.query_types().defined().find_all();

        assert_eq!(all_types.len(), 9);
        assert_eq!(defined_types.len(), 5);
        assert!(defined_types.iter().all(|t| t.is_defined()));
    }

    #[test]
    fn test_type_query_chained_filters() {
        let assembly = plugins();

        let public_classes: Vec<String> = assembly
            .query_types()
            .defined()
            .public()
            .filter(|t| !t.is_attribute() && !t.is_enum())
            .iter()
            .map(|t| t.fullname())
            .collect();
        assert_eq!(public_classes, vec!["Plugins.Loader"]);

        assert_eq!(assembly.query_types().namespace("Plugins.Detail").count(), 1);
        assert_eq!(assembly.query_types().defined().enums().count(), 1);
        assert_eq!(
            assembly.query_types().defined().attribute_classes().count(),
            2
        );
    }

    #[test]
    fn test_type_query_attribute_filters() {
        let assembly = plugins();
        let exported = assembly.get_type("Plugins.ExportedAttribute").unwrap();
        let internal = assembly.get_type("Plugins.InternalAttribute").unwrap();
        let both = [exported.clone(), internal.clone()];

        assert_eq!(
            names(assembly.query_types().with_attribute(&exported)),
            vec!["Loader", "Cache"]
        );
        assert_eq!(
            names(assembly.query_types().with_attribute_of::<Exported>()),
            vec!["Loader", "Cache"]
        );
        assert_eq!(
            names(assembly.query_types().with_all_attributes(&both)),
            vec!["Cache"]
        );
        assert_eq!(
            names(assembly.query_types().with_any_attribute(&[])),
            vec!["Loader", "Cache"]
        );
        assert!(!assembly
            .query_types()
            .with_attribute(&internal)
            .public()
            .exists());
    }

    #[test]
    fn test_type_query_exists_and_tokens() {
        let assembly = plugins();

        let query = assembly.query_types().defined().name("Loader");
        assert!(query.exists());
        let loader = query.find_first().unwrap();
        assert_eq!(query.tokens(), vec![loader.token]);
        assert!(assembly.query_types().name("Missing").find_first().is_none());
    }
}
