//! Custom attribute representation for the metadata model.
//!
//! Custom attributes are metadata annotations attached to types, fields, methods,
//! properties, events and enum values. Each instance records its attribute class (the
//! *kind*) together with the constructor arguments and named field/property values it was
//! created with, mirroring the ECMA-335 II.23.3 blob layout in already-decoded form.
//!
//! # Kinds
//!
//! Attribute classes are ordinary [`crate::metadata::typesystem::CilType`]s deriving from
//! `System.Attribute`. Kind matching follows the class hierarchy, see [`matches`].
//!
//! # Typed access
//!
//! The [`AttributeType`] trait maps an attribute class to a Rust type, which is how the
//! typed query variants (`custom_attributes_of::<K>()` and friends) are expressed.
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 21 - Custom Attributes
//! - ECMA-335 6th Edition, Partition II, Section 23.3 - Custom Attributes

mod kind;
mod types;

pub use kind::{matches, matches_fullname, AttributeType};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{TypeBuilder, TypeRegistry};

    #[test]
    fn test_kind_matching_follows_hierarchy() {
        let registry = TypeRegistry::new("Kinds").unwrap();
        let base = TypeBuilder::new(&registry)
            .attribute_class("Validation", "ConstraintAttribute")
            .build()
            .unwrap();
        let derived = TypeBuilder::new(&registry)
            .attribute_class("Validation", "RangeAttribute")
            .extends(&base)
            .build()
            .unwrap();

        assert!(matches(&derived, &derived));
        assert!(matches(&derived, &base));
        assert!(!matches(&base, &derived));
        assert!(matches(&derived, &registry.attribute_type()));

        assert!(matches_fullname(&derived, "Validation.RangeAttribute"));
        assert!(matches_fullname(&derived, "Validation.ConstraintAttribute"));
        assert!(matches_fullname(&derived, "System.Attribute"));
        assert!(!matches_fullname(&base, "Validation.RangeAttribute"));
    }

    #[test]
    fn test_attribute_instance_kind_queries() {
        let registry = TypeRegistry::new("Kinds").unwrap();
        let base = TypeBuilder::new(&registry)
            .attribute_class("Validation", "ConstraintAttribute")
            .build()
            .unwrap();
        let derived = TypeBuilder::new(&registry)
            .attribute_class("Validation", "RangeAttribute")
            .extends(&base)
            .build()
            .unwrap();
        let target = TypeBuilder::new(&registry)
            .class("Sample", "Target")
            .attribute_with(
                &derived,
                CustomAttributeValue::default()
                    .fixed(CustomAttributeArgument::I4(1))
                    .property("Max", CustomAttributeArgument::I4(10)),
            )
            .build()
            .unwrap();

        let (_, attribute) = target.custom_attributes.iter().next().unwrap();
        assert!(attribute.is_kind(&base));
        assert!(attribute.is_kind(&derived));
        assert!(attribute.is_kind_named("Validation.ConstraintAttribute"));
        assert_eq!(
            attribute.kind_fullname().as_deref(),
            Some("Validation.RangeAttribute")
        );
        assert_eq!(attribute.fixed_arg(0), Some(&CustomAttributeArgument::I4(1)));
        assert_eq!(attribute.fixed_arg(1), None);
        assert_eq!(
            attribute.named_arg("Max").and_then(CustomAttributeArgument::as_i64),
            Some(10)
        );
        assert!(attribute.named_arg("Min").is_none());
    }

    #[test]
    fn test_raw_attribute_type_matches_every_instance() {
        let registry = TypeRegistry::new("Kinds").unwrap();
        let marker = TypeBuilder::new(&registry)
            .attribute_class("Sample", "MarkerAttribute")
            .build()
            .unwrap();
        let target = TypeBuilder::new(&registry)
            .class("Sample", "Target")
            .attribute(&marker)
            .build()
            .unwrap();

        let (_, attribute) = target.custom_attributes.iter().next().unwrap();
        assert!(attribute.is_kind_named(<CustomAttributeRc as AttributeType>::FULLNAME));
        let decoded = <CustomAttributeRc as AttributeType>::from_attribute(attribute);
        assert_eq!(decoded.token, attribute.token);
    }
}
