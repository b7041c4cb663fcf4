//! Presence checks built on [`HasCustomAttributes`].
//!
//! [`AttributePredicates`] is implemented for every annotatable element. None of the
//! checks can fail: a missing attribute is `false`.

use crate::metadata::{
    customattributes::AttributeType, query::HasCustomAttributes, typesystem::CilTypeRc,
};

/// Boolean attribute checks, available on every [`HasCustomAttributes`] element
pub trait AttributePredicates: HasCustomAttributes {
    /// Returns true if an attribute of class `kind` (or derived from it) is attached
    ///
    /// ## Arguments
    /// * 'kind' - The attribute class to look for
    fn has_custom_attribute(&self, kind: &CilTypeRc) -> bool {
        self.first_custom_attribute_of_kind(kind).is_some()
    }

    /// Returns true if an attribute of class `K::FULLNAME` (or derived from it) is attached
    fn has_custom_attribute_of<K: AttributeType>(&self) -> bool {
        self.all_custom_attributes()
            .any(|attribute| attribute.is_kind_named(K::FULLNAME))
    }

    /// Returns true if an attribute matching at least one of `kinds` is attached
    ///
    /// An empty `kinds` places no restriction: the result is whether any attribute is
    /// attached at all.
    ///
    /// ## Arguments
    /// * 'kinds' - Attribute classes to look for
    fn has_any_custom_attribute(&self, kinds: &[CilTypeRc]) -> bool {
        self.custom_attributes(kinds).next().is_some()
    }

    /// Returns true if, for every class in `kinds`, a matching attribute is attached
    ///
    /// Each kind is checked on its own, a single attribute may satisfy several kinds.
    /// An empty `kinds` is vacuously true.
    ///
    /// ## Arguments
    /// * 'kinds' - Attribute classes that all must be present
    fn has_all_custom_attributes(&self, kinds: &[CilTypeRc]) -> bool {
        kinds.iter().all(|kind| self.has_custom_attribute(kind))
    }
}

impl<T: HasCustomAttributes + ?Sized> AttributePredicates for T {}
