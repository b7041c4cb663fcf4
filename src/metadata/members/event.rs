use std::sync::Arc;

use crate::metadata::{
    customattributes::CustomAttributeList,
    members::{MemberAccess, MethodRc},
    token::Token,
    typesystem::{CilTypeRc, CilTypeRef},
};

/// A vector that holds a list of `Event`
pub type EventList = Arc<boxcar::Vec<EventRc>>;
/// A reference to an `Event`
pub type EventRc = Arc<Event>;

/// Represents an Event that a Type can have. Visibility and scope follow its accessors.
pub struct Event {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `EventAttributes`, §II.23.1.4
    pub flags: u32,
    /// The name of the event
    pub name: String,
    /// The type declaring this event
    pub declaring_type: CilTypeRef,
    /// The `Method` that triggers '`OnAdd`'
    pub fn_on_add: Option<MethodRc>,
    /// The `Method` that triggers '`OnRemove`'
    pub fn_on_remove: Option<MethodRc>,
    /// Custom attributes attached to this event
    pub custom_attributes: CustomAttributeList,
}

impl Event {
    /// Create a new event declared on `declaring_type`
    pub fn new(
        token: Token,
        name: String,
        flags: u32,
        declaring_type: &CilTypeRc,
        fn_on_add: Option<MethodRc>,
        fn_on_remove: Option<MethodRc>,
    ) -> Self {
        Event {
            token,
            flags,
            name,
            declaring_type: CilTypeRef::new(declaring_type),
            fn_on_add,
            fn_on_remove,
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// The accessor methods of this event
    pub fn accessors(&self) -> impl Iterator<Item = &MethodRc> {
        self.fn_on_add.iter().chain(self.fn_on_remove.iter())
    }

    /// Returns true if any accessor is public
    #[must_use]
    pub fn is_public(&self) -> bool {
        MemberAccess::most_visible(self.accessors().map(|m| m.flags_access))
            == MemberAccess::Public
    }

    /// Returns true if any accessor is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.accessors().any(|m| m.is_static())
    }
}
