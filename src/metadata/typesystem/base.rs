use std::sync::{Arc, Weak};

use bitflags::bitflags;
use strum::{Display, EnumIter};

use crate::metadata::{
    token::Token,
    typesystem::{CilType, CilTypeRc},
};

/// A vector that holds `CilTypeRef` instances (weak references)
pub type CilTypeRefList = Arc<boxcar::Vec<CilTypeRef>>;

/// Maximum number of base types followed when walking a type hierarchy
pub const MAX_HIERARCHY_DEPTH: usize = 256;

/// A smart reference to a `CilType` that automatically handles weak references
/// to prevent circular reference memory leaks while providing a clean API
#[derive(Clone, Debug)]
pub struct CilTypeRef {
    weak_ref: Weak<CilType>,
}

impl CilTypeRef {
    /// Create a new `CilTypeRef` from a strong reference
    pub fn new(strong_ref: &CilTypeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<CilTypeRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced type is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Get the token of the referenced type (if still alive)
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.upgrade().map(|t| t.token)
    }

    /// Get the name of the referenced type (if still alive)
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.upgrade().map(|t| t.name.clone())
    }

    /// Get the full name of the referenced type (if still alive)
    #[must_use]
    pub fn fullname(&self) -> Option<String> {
        self.upgrade().map(|t| t.fullname())
    }
}

impl From<CilTypeRc> for CilTypeRef {
    fn from(strong_ref: CilTypeRc) -> Self {
        Self::new(&strong_ref)
    }
}

/// Where a type is defined
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSource {
    /// Declared in the assembly owning the registry
    CurrentModule,
    /// Imported from another assembly (name of that assembly)
    External(String),
}

impl TypeSource {
    /// Returns true if the type is imported from another assembly
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, TypeSource::External(_))
    }
}

/// Represents the broad category of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum CilFlavor {
    /// Reference type
    Class,
    /// Value type (struct)
    ValueType,
    /// Interface
    Interface,
    /// Enumeration, a sealed value type deriving from `System.Enum`
    Enum,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Type attributes, §II.23.1.15
    pub struct TypeAttributes: u32 {
        /// Class is public scope
        const PUBLIC = 0x0000_0001;
        /// Class is nested with public visibility
        const NESTED_PUBLIC = 0x0000_0002;
        /// Class is nested with private visibility
        const NESTED_PRIVATE = 0x0000_0003;
        /// Class is nested with family visibility
        const NESTED_FAMILY = 0x0000_0004;
        /// Class is nested with assembly visibility
        const NESTED_ASSEMBLY = 0x0000_0005;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Class is abstract
        const ABSTRACT = 0x0000_0080;
        /// Class cannot be extended
        const SEALED = 0x0000_0100;
        /// Class name is special
        const SPECIAL_NAME = 0x0000_0400;
        /// Class is serializable
        const SERIALIZABLE = 0x0000_2000;
        /// Initialize the class before first static field access
        const BEFORE_FIELD_INIT = 0x0010_0000;
    }
}

/// Bitmask for visibility extraction from `TypeAttributes`
pub const TYPE_VISIBILITY_MASK: u32 = 0x0000_0007;

impl TypeAttributes {
    /// The visibility bits only
    #[must_use]
    pub fn visibility(&self) -> u32 {
        self.bits() & TYPE_VISIBILITY_MASK
    }

    /// Return a copy with the visibility bits replaced by `visibility`
    #[must_use]
    pub fn with_visibility(self, visibility: TypeAttributes) -> Self {
        TypeAttributes::from_bits_retain(
            (self.bits() & !TYPE_VISIBILITY_MASK) | (visibility.bits() & TYPE_VISIBILITY_MASK),
        )
    }
}
