use std::sync::Arc;

use crate::metadata::{
    customattributes::CustomAttributeList,
    members::MemberAccess,
    token::Token,
    typesystem::{CilTypeRc, CilTypeRef},
};

/// A vector that holds a list of `Field`
pub type FieldList = Arc<boxcar::Vec<FieldRc>>;
/// A reference to a field
pub type FieldRc = Arc<Field>;

#[allow(non_snake_case)]
/// All possible flags for `FieldAttributes`
pub mod FieldAttributes {
    /// These 3 bits contain one of the following values:
    pub const FIELD_ACCESS_MASK: u32 = 0x0007;
    /// Member not referenceable
    pub const COMPILER_CONTROLLED: u32 = 0x0000;
    /// Accessible only by the parent type
    pub const PRIVATE: u32 = 0x0001;
    /// Accessible by sub-types only in this Assembly
    pub const FAM_AND_ASSEM: u32 = 0x0002;
    /// Accessibly by anyone in the Assembly
    pub const ASSEMBLY: u32 = 0x0003;
    /// Accessible only by type and sub-types
    pub const FAMILY: u32 = 0x0004;
    /// Accessibly by sub-types anywhere, plus anyone in assembly
    pub const FAM_OR_ASSEM: u32 = 0x0005;
    /// Accessibly by anyone who has visibility to this scope field contract attributes
    pub const PUBLIC: u32 = 0x0006;
    /// Defined on type, else per instance
    pub const STATIC: u32 = 0x0010;
    /// Field can only be initialized, not written to after init
    pub const INIT_ONLY: u32 = 0x0020;
    /// Value is compile time constant
    pub const LITERAL: u32 = 0x0040;
    /// Reserved (to indicate this field should not be serialized when type is remoted)
    pub const NOT_SERIALIZED: u32 = 0x0080;
    /// Field is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// CLI provides 'special' behavior, depending upon the name of the field
    pub const RTSPECIAL_NAME: u32 = 0x0400;
    /// Field has default
    pub const HAS_DEFAULT: u32 = 0x8000;
}

/// A field declared on a type
pub struct Field {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `FieldAttributes`, §II.23.1.5
    pub flags: u32,
    /// The name of the field
    pub name: String,
    /// The compile-time constant of literal fields, widened to `i64` (enum members)
    pub constant: Option<i64>,
    /// The type declaring this field
    pub declaring_type: CilTypeRef,
    /// Custom attributes applied to this field
    pub custom_attributes: CustomAttributeList,
}

impl Field {
    /// Create a new field declared on `declaring_type`
    pub fn new(
        token: Token,
        name: String,
        flags: u32,
        constant: Option<i64>,
        declaring_type: &CilTypeRc,
    ) -> Self {
        Field {
            token,
            flags,
            name,
            constant,
            declaring_type: CilTypeRef::new(declaring_type),
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Accessibility of this field
    #[must_use]
    pub fn access(&self) -> MemberAccess {
        MemberAccess::from_flags(self.flags)
    }

    /// Returns true if this field is public
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access() == MemberAccess::Public
    }

    /// Returns true if this field is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags & FieldAttributes::STATIC != 0
    }

    /// Returns true if this field is a compile-time constant
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.flags & FieldAttributes::LITERAL != 0
    }

    /// Returns true if this field can only be assigned during initialization
    #[must_use]
    pub fn is_init_only(&self) -> bool {
        self.flags & FieldAttributes::INIT_ONLY != 0
    }
}
