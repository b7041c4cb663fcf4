use std::sync::Arc;

use bitflags::bitflags;

use crate::metadata::{
    customattributes::CustomAttributeList,
    members::MemberAccess,
    token::Token,
    typesystem::{CilTypeRc, CilTypeRef},
};

/// A vector that holds a list of `Method`
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;
/// A reference to a `Method`
pub type MethodRc = Arc<Method>;

/// Name of instance constructors
pub const CTOR_NAME: &str = ".ctor";
/// Name of type initializers (static constructors)
pub const CCTOR_NAME: &str = ".cctor";

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method modifier flags, §II.23.1.10
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method may not be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, depending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
    }
}

/// A method declared on a type; constructors and property/event accessors included
pub struct Method {
    /// Token
    pub token: Token,
    /// The name of the method
    pub name: String,
    /// Accessibility
    pub flags_access: MemberAccess,
    /// Modifiers
    pub flags_modifiers: MethodModifiers,
    /// The type declaring this method
    pub declaring_type: CilTypeRef,
    /// Custom attributes applied to this method
    pub custom_attributes: CustomAttributeList,
}

impl Method {
    /// Create a new method declared on `declaring_type`
    pub fn new(
        token: Token,
        name: String,
        flags_access: MemberAccess,
        flags_modifiers: MethodModifiers,
        declaring_type: &CilTypeRc,
    ) -> Self {
        Method {
            token,
            name,
            flags_access,
            flags_modifiers,
            declaring_type: CilTypeRef::new(declaring_type),
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Returns true if this method is public
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags_access == MemberAccess::Public
    }

    /// Returns true if this method is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::STATIC)
    }

    /// Returns true if this method is virtual
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::VIRTUAL)
    }

    /// Returns true if this method is abstract
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::ABSTRACT)
    }

    /// Returns true for instance constructors (`.ctor`)
    #[must_use]
    pub fn is_ctor(&self) -> bool {
        self.name == CTOR_NAME && self.flags_modifiers.contains(MethodModifiers::RTSPECIAL_NAME)
    }

    /// Returns true for type initializers (`.cctor`)
    #[must_use]
    pub fn is_cctor(&self) -> bool {
        self.name == CCTOR_NAME && self.flags_modifiers.contains(MethodModifiers::RTSPECIAL_NAME)
    }

    /// Returns true for instance constructors and type initializers
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.is_ctor() || self.is_cctor()
    }
}
