//! Attribute kind matching and typed attribute decoding.
//!
//! A queried kind matches an attribute instance when the instance's attribute class *is*
//! the queried class or derives from it. The relation is asymmetric: querying by a
//! derived class never matches an instance of its base class.

use std::ptr;

use crate::metadata::{customattributes::CustomAttributeRc, typesystem::CilType};

/// A Rust-side view of an attribute class, used by the typed query variants.
///
/// `FULLNAME` identifies the attribute class in the metadata model (e.g.
/// `"System.ObsoleteAttribute"`). Instances matching that class, or any class derived
/// from it, are handed to [`AttributeType::from_attribute`] for decoding. Decoding is
/// infallible so that typed queries yield exactly the instances the untyped queries do;
/// implementations should map missing or mistyped arguments to defaults.
///
/// # Example
///
/// ```rust
/// use attrscope::metadata::customattributes::{AttributeType, CustomAttributeRc};
///
/// struct Obsolete {
///     message: Option<String>,
/// }
///
/// impl AttributeType for Obsolete {
///     const FULLNAME: &'static str = "System.ObsoleteAttribute";
///
///     fn from_attribute(attribute: &CustomAttributeRc) -> Self {
///         Obsolete {
///             message: attribute
///                 .fixed_arg(0)
///                 .and_then(|arg| arg.as_str())
///                 .map(str::to_string),
///         }
///     }
/// }
/// ```
pub trait AttributeType: Sized {
    /// Full name (`Namespace.Name`) of the attribute class
    const FULLNAME: &'static str;

    /// Decode an attribute instance whose kind is `FULLNAME` or derived from it
    fn from_attribute(attribute: &CustomAttributeRc) -> Self;
}

/// Every attribute instance can be viewed as its raw shared representation; querying with
/// this type matches all attributes deriving from `System.Attribute`.
impl AttributeType for CustomAttributeRc {
    const FULLNAME: &'static str = "System.Attribute";

    fn from_attribute(attribute: &CustomAttributeRc) -> Self {
        attribute.clone()
    }
}

/// Returns true if `instance` is `queried` or a strict subtype of it
#[must_use]
pub fn matches(instance: &CilType, queried: &CilType) -> bool {
    ptr::eq(instance, queried) || instance.is_subclass_of(queried)
}

/// Returns true if `instance` is named `fullname` or a strict subtype of a type named so
#[must_use]
pub fn matches_fullname(instance: &CilType, fullname: &str) -> bool {
    instance.fullname() == fullname || instance.inherits_from_fullname(fullname)
}
