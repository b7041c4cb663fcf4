//! Type system of the metadata model.
//!
//! This module provides the representation of types and their relationships: type
//! definitions with their members and attached custom attributes, the base-type chain used
//! for attribute kind matching, and the registry that owns every type of an assembly.
//!
//! # Key Components
//!
//! - [`CilType`]: Core type representation (namespace, name, flags, members, attributes)
//! - [`TypeRegistry`]: Central registry for all types in an assembly
//! - [`TypeBuilder`]: Builder pattern for declaring types, members and attributes
//!
//! # Examples
//!
//! ```rust
//! use attrscope::metadata::typesystem::{TypeBuilder, TypeRegistry};
//!
//! let registry = TypeRegistry::new("Sample")?;
//! let shape = TypeBuilder::new(&registry)
//!     .class("Geometry", "Shape")
//!     .public()
//!     .field("radius", |f| f.public())
//!     .build()?;
//!
//! assert_eq!(shape.fullname(), "Geometry.Shape");
//! assert!(shape.is_subclass_of(&registry.object_type()));
//! # Ok::<(), attrscope::Error>(())
//! ```

mod base;
mod builder;
mod registry;

use std::sync::{Arc, OnceLock};

pub use base::{
    CilFlavor, CilTypeRef, CilTypeRefList, TypeAttributes, TypeSource, MAX_HIERARCHY_DEPTH,
    TYPE_VISIBILITY_MASK,
};
pub use builder::{EventBuilder, FieldBuilder, MethodBuilder, PropertyBuilder, TypeBuilder};
pub use registry::{TypeRegistry, CORE_ASSEMBLY};

use crate::metadata::{
    customattributes::CustomAttributeList,
    members::{EventList, FieldList, FieldRc, MethodList, PropertyList},
    token::Token,
};

/// A vector that holds a list of `CilType`
pub type CilTypeList = Arc<boxcar::Vec<CilTypeRc>>;
/// Reference to a `CilType`
pub type CilTypeRc = Arc<CilType>;

/// Represents a 'Type' of the metadata model: a type definition of the current module, or
/// an imported core type such as `System.Object` or `System.Attribute`.
pub struct CilType {
    /// Token
    pub token: Token,
    /// The `TypeFlavor`
    pub flavor: CilFlavor,
    /// `TypeNamespace` (can be empty)
    pub namespace: String,
    /// `TypeName`
    pub name: String,
    /// Where this type is defined
    pub source: TypeSource,
    /// This types base aka 'extends'
    base: Option<CilTypeRef>,
    /// The type this type is nested in
    enclosing_type: OnceLock<CilTypeRef>,
    /// Flags (`TypeAttributes`, §II.23.1.15)
    pub flags: TypeAttributes,
    /// All fields this type has
    pub fields: FieldList,
    /// All methods this type has, including constructors and accessors
    pub methods: MethodList,
    /// All properties this type has
    pub properties: PropertyList,
    /// All events this type has
    pub events: EventList,
    /// All types that are 'contained' in this type
    pub nested_types: CilTypeRefList,
    /// All custom attributes this type has
    pub custom_attributes: CustomAttributeList,
}

impl CilType {
    /// Create a new instance of a `CilType` without members
    pub fn new(
        token: Token,
        flavor: CilFlavor,
        namespace: String,
        name: String,
        source: TypeSource,
        base: Option<&CilTypeRc>,
        flags: TypeAttributes,
    ) -> Self {
        CilType {
            token,
            flavor,
            namespace,
            name,
            source,
            base: base.map(CilTypeRef::new),
            enclosing_type: OnceLock::new(),
            flags,
            fields: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
            properties: Arc::new(boxcar::Vec::new()),
            events: Arc::new(boxcar::Vec::new()),
            nested_types: Arc::new(boxcar::Vec::new()),
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Access the base type of this type, if it exists
    pub fn base(&self) -> Option<CilTypeRc> {
        self.base.as_ref().and_then(CilTypeRef::upgrade)
    }

    /// Access the enclosing type of a nested type
    pub fn enclosing_type(&self) -> Option<CilTypeRc> {
        self.enclosing_type.get().and_then(CilTypeRef::upgrade)
    }

    pub(crate) fn set_enclosing_type(&self, enclosing: &CilTypeRc) {
        self.enclosing_type.set(CilTypeRef::new(enclosing)).ok();
    }

    /// Returns the full name of the entity
    ///
    /// `Namespace.Name` for top-level types, `Enclosing+Name` for nested types and just
    /// `Name` for types without namespace.
    pub fn fullname(&self) -> String {
        if let Some(enclosing) = self.enclosing_type() {
            format!("{}+{}", enclosing.fullname(), self.name)
        } else if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// Iterate over the base chain of this type, starting with the direct base
    pub fn hierarchy(&self) -> Hierarchy {
        Hierarchy {
            next: self.base(),
            depth: 0,
        }
    }

    /// Returns true if `other` appears in the base chain of this type
    ///
    /// A type is not a subclass of itself.
    pub fn is_subclass_of(&self, other: &CilType) -> bool {
        self.hierarchy().any(|base| std::ptr::eq(&*base, other))
    }

    /// Returns true if a type named `fullname` appears in the base chain of this type
    pub fn inherits_from_fullname(&self, fullname: &str) -> bool {
        self.hierarchy().any(|base| base.fullname() == fullname)
    }

    /// Returns true if this type is an attribute class (derives from `System.Attribute`)
    pub fn is_attribute(&self) -> bool {
        self.inherits_from_fullname("System.Attribute")
    }

    /// Returns true if this is an enumeration
    pub fn is_enum(&self) -> bool {
        self.flavor == CilFlavor::Enum
    }

    /// Returns true if this is an interface
    pub fn is_interface(&self) -> bool {
        self.flavor == CilFlavor::Interface
    }

    /// Returns true if this type is defined in the assembly owning its registry
    pub fn is_defined(&self) -> bool {
        !self.source.is_external()
    }

    /// Returns true if this type is publicly visible (public or nested public)
    pub fn is_public(&self) -> bool {
        let visibility = self.flags.visibility();
        visibility == TypeAttributes::PUBLIC.bits()
            || visibility == TypeAttributes::NESTED_PUBLIC.bits()
    }

    /// Returns true if this type is sealed
    pub fn is_sealed(&self) -> bool {
        self.flags.contains(TypeAttributes::SEALED)
    }

    /// Returns true if this type is abstract
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeAttributes::ABSTRACT)
    }

    /// The named constants of an enumeration (its public static literal fields)
    ///
    /// Empty for anything that is not an enumeration.
    pub fn enum_values(&self) -> impl Iterator<Item = FieldRc> + '_ {
        let is_enum = self.is_enum();
        self.fields
            .iter()
            .map(|(_, field)| field)
            .filter(move |field| is_enum && field.is_literal() && field.is_static())
            .cloned()
    }
}

/// Iterator over the base chain of a type, see [`CilType::hierarchy`].
///
/// Stops after [`MAX_HIERARCHY_DEPTH`] steps.
pub struct Hierarchy {
    next: Option<CilTypeRc>,
    depth: usize,
}

impl Iterator for Hierarchy {
    type Item = CilTypeRc;

    fn next(&mut self) -> Option<Self::Item> {
        if self.depth >= MAX_HIERARCHY_DEPTH {
            return None;
        }

        let current = self.next.take()?;
        self.next = current.base();
        self.depth += 1;
        Some(current)
    }
}
