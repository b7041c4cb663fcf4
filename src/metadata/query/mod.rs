//! Custom attribute queries over the metadata model.
//!
//! Queries come in three tiers, each built on the one below:
//!
//! - [`HasCustomAttributes`] (accessor): the attributes attached to one element, optionally
//!   filtered by attribute class, plus first-match lookups
//! - [`AttributePredicates`] (predicates): presence checks for one, any or all of a set of
//!   attribute classes
//! - Collectors: inherent methods on [`crate::metadata::assembly::Assembly`] and
//!   [`crate::metadata::typesystem::CilType`] selecting types and members by their attributes,
//!   with [`MemberAttributeMap`] pairing members with their matching attributes, and
//!   [`TypeQuery`] composing attribute filters with other type filters
//!
//! Every query only reads the model. Absence is expressed as `None`, `false` or an empty
//! sequence; no query returns an error.
//!
//! # Kind matching
//!
//! Querying by attribute class `Q` matches instances of `Q` and of every class deriving
//! from `Q`, never instances of a base class of `Q`. The typed variants identify the class
//! through [`crate::metadata::customattributes::AttributeType::FULLNAME`].
//!
//! # Examples
//!
//! ```rust
//! use attrscope::prelude::*;
//!
//! let assembly = Assembly::new("Geometry")?;
//! let required = TypeBuilder::new(assembly.registry())
//!     .attribute_class("Validation", "RequiredAttribute")
//!     .build()?;
//! let shape = TypeBuilder::new(assembly.registry())
//!     .class("Geometry", "Shape")
//!     .attribute(&required)
//!     .field("radius", |f| f.public().attribute(&required))
//!     .field("label", |f| f.public())
//!     .build()?;
//!
//! assert!(shape.has_custom_attribute(&required));
//! assert_eq!(assembly.types_with_attribute(&required).count(), 1);
//!
//! let kinds = [required.clone()];
//! let annotated: Vec<String> = shape
//!     .fields_and_properties_with_attribute(&kinds)
//!     .map(|member| member.name())
//!     .collect();
//! assert_eq!(annotated, vec!["radius"]);
//! # Ok::<(), attrscope::Error>(())
//! ```

mod accessor;
mod collector;
mod predicate;
mod typequery;

pub use accessor::{CustomAttributeIter, HasCustomAttributes, TypedAttributeIter};
pub use collector::MemberAttributeMap;
pub use predicate::AttributePredicates;
pub use typequery::{TypeQuery, TypeQueryIter};
