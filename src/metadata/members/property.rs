use std::sync::Arc;

use crate::metadata::{
    customattributes::CustomAttributeList,
    members::{MemberAccess, MethodRc},
    token::Token,
    typesystem::{CilTypeRc, CilTypeRef},
};

/// A vector that holds a list of `Property`
pub type PropertyList = Arc<boxcar::Vec<PropertyRc>>;
/// A reference to a `Property`
pub type PropertyRc = Arc<Property>;

#[allow(non_snake_case)]
/// All possible flags for `PropertyAttributes`
pub mod PropertyAttributes {
    /// Property is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// Runtime (metadata internal APIs) should check name encoding
    pub const RT_SPECIAL_NAME: u32 = 0x0400;
    /// Property has default
    pub const HAS_DEFAULT: u32 = 0x1000;
}

/// A property declared on a type.
///
/// Visibility and scope of a property are those of its accessors: it is public if any
/// accessor is public and static if any accessor is static.
pub struct Property {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `PropertyAttributes`, §II.23.1.14
    pub flags: u32,
    /// The name of this property
    pub name: String,
    /// The type declaring this property
    pub declaring_type: CilTypeRef,
    /// The `Method` that retrieves this property
    pub fn_getter: Option<MethodRc>,
    /// The `Method` that sets this property
    pub fn_setter: Option<MethodRc>,
    /// Custom attributes attached to this property
    pub custom_attributes: CustomAttributeList,
}

impl Property {
    /// Create a new property declared on `declaring_type`
    pub fn new(
        token: Token,
        name: String,
        flags: u32,
        declaring_type: &CilTypeRc,
        fn_getter: Option<MethodRc>,
        fn_setter: Option<MethodRc>,
    ) -> Self {
        Property {
            token,
            flags,
            name,
            declaring_type: CilTypeRef::new(declaring_type),
            fn_getter,
            fn_setter,
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// The accessor methods of this property
    pub fn accessors(&self) -> impl Iterator<Item = &MethodRc> {
        self.fn_getter.iter().chain(self.fn_setter.iter())
    }

    /// Accessibility of the most visible accessor, `Private` without accessors
    #[must_use]
    pub fn access(&self) -> MemberAccess {
        MemberAccess::most_visible(self.accessors().map(|m| m.flags_access))
    }

    /// Returns true if any accessor is public
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access() == MemberAccess::Public
    }

    /// Returns true if any accessor is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.accessors().any(|m| m.is_static())
    }
}
