//! Members of types: fields, methods, constructors, properties, events and nested types.
//!
//! Besides the member representations themselves this module provides member
//! enumeration, [`CilType::members`], which selects members by their kind
//! ([`MemberKinds`]) and binding ([`BindingFlags`]: visibility and static/instance scope).
//!
//! # Enumeration order
//!
//! Declared members come first, grouped as fields, constructors, methods, properties,
//! events and nested types, each group in declaration order. Unless
//! [`BindingFlags::DECLARED_ONLY`] is requested, the non-private instance members of the
//! base types follow, closest base first. Constructors and nested types are never
//! inherited. A virtual method, property or event that a type closer in the chain
//! overrides (a virtual member of the same kind and name) is listed once, from the
//! overriding type.
//!
//! # Examples
//!
//! ```rust
//! use attrscope::metadata::{
//!     members::{BindingFlags, MemberKinds},
//!     typesystem::{TypeBuilder, TypeRegistry},
//! };
//!
//! let registry = TypeRegistry::new("Sample")?;
//! let shape = TypeBuilder::new(&registry)
//!     .class("Geometry", "Shape")
//!     .field("radius", |f| f.public())
//!     .field("cache", |f| f.private().with_static())
//!     .build()?;
//!
//! let public_instance: Vec<String> = shape
//!     .members(MemberKinds::FIELD, BindingFlags::PUBLIC | BindingFlags::INSTANCE)
//!     .map(|m| m.name())
//!     .collect();
//! assert_eq!(public_instance, vec!["radius"]);
//! # Ok::<(), attrscope::Error>(())
//! ```

mod enumvalue;
mod event;
mod field;
mod method;
mod property;

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use bitflags::bitflags;
use strum::{Display, EnumIter};

pub use enumvalue::{EnumValue, MetadataEnum};
pub use event::{Event, EventList, EventRc};
pub use field::{Field, FieldAttributes, FieldList, FieldRc};
pub use method::{Method, MethodList, MethodModifiers, MethodRc, CCTOR_NAME, CTOR_NAME};
pub use property::{Property, PropertyAttributes, PropertyList, PropertyRc};

use crate::metadata::{
    token::Token,
    typesystem::{CilType, CilTypeRc},
};

/// Bitmask for access extraction from field and method flags
pub const MEMBER_ACCESS_MASK: u32 = 0x0007;

/// Accessibility of a field or method, §II.23.1.5 and §II.23.1.10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum MemberAccess {
    /// Member not referenceable
    CompilerControlled,
    /// Accessible only by the parent type
    Private,
    /// Accessible by sub-types only in this Assembly
    FamAndAssem,
    /// Accessibly by anyone in the Assembly
    Assembly,
    /// Accessible only by type and sub-types
    Family,
    /// Accessibly by sub-types anywhere, plus anyone in assembly
    FamOrAssem,
    /// Accessibly by anyone who has visibility to this scope
    Public,
}

impl MemberAccess {
    /// Extract the accessibility from raw field or method flags
    #[must_use]
    pub fn from_flags(flags: u32) -> Self {
        match flags & MEMBER_ACCESS_MASK {
            0x0001 => MemberAccess::Private,
            0x0002 => MemberAccess::FamAndAssem,
            0x0003 => MemberAccess::Assembly,
            0x0004 => MemberAccess::Family,
            0x0005 => MemberAccess::FamOrAssem,
            0x0006 => MemberAccess::Public,
            _ => MemberAccess::CompilerControlled,
        }
    }

    /// The raw flag bits of this accessibility
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            MemberAccess::CompilerControlled => 0x0000,
            MemberAccess::Private => 0x0001,
            MemberAccess::FamAndAssem => 0x0002,
            MemberAccess::Assembly => 0x0003,
            MemberAccess::Family => 0x0004,
            MemberAccess::FamOrAssem => 0x0005,
            MemberAccess::Public => 0x0006,
        }
    }

    /// Returns true if the member cannot be seen from derived types
    #[must_use]
    pub fn is_private(self) -> bool {
        matches!(self, MemberAccess::Private | MemberAccess::CompilerControlled)
    }

    /// The most visible accessibility of `accesses`, `Private` if there is none
    ///
    /// `Family` and `Assembly` are incomparable; `Family` is preferred as it is the one
    /// visible to derived types.
    pub fn most_visible(accesses: impl IntoIterator<Item = MemberAccess>) -> MemberAccess {
        accesses
            .into_iter()
            .max_by_key(|access| access.rank())
            .unwrap_or(MemberAccess::Private)
    }

    fn rank(self) -> u8 {
        match self {
            MemberAccess::CompilerControlled => 0,
            MemberAccess::Private => 1,
            MemberAccess::FamAndAssem => 2,
            MemberAccess::Assembly => 3,
            MemberAccess::Family => 4,
            MemberAccess::FamOrAssem => 5,
            MemberAccess::Public => 6,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Selection of member kinds for member enumeration
    pub struct MemberKinds: u32 {
        /// Fields, enum constants included
        const FIELD = 0x01;
        /// Constructors and type initializers
        const CONSTRUCTOR = 0x02;
        /// Methods, accessors included
        const METHOD = 0x04;
        /// Properties
        const PROPERTY = 0x08;
        /// Events
        const EVENT = 0x10;
        /// Nested types
        const NESTED_TYPE = 0x20;
        /// Every kind
        const ALL = Self::FIELD.bits()
            | Self::CONSTRUCTOR.bits()
            | Self::METHOD.bits()
            | Self::PROPERTY.bits()
            | Self::EVENT.bits()
            | Self::NESTED_TYPE.bits();
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Binding filter for member enumeration.
    ///
    /// A member is selected when the filter contains its visibility (`PUBLIC` or
    /// `NON_PUBLIC`) and its scope (`STATIC` or `INSTANCE`). A filter missing either group
    /// therefore selects nothing. Nested types have no scope and only test visibility.
    pub struct BindingFlags: u32 {
        /// Public members
        const PUBLIC = 0x01;
        /// Non-public members
        const NON_PUBLIC = 0x02;
        /// Instance members
        const INSTANCE = 0x04;
        /// Static members
        const STATIC = 0x08;
        /// Skip members inherited from base types
        const DECLARED_ONLY = 0x10;
    }
}

impl Default for BindingFlags {
    /// Every visibility and scope, inherited members included
    fn default() -> Self {
        BindingFlags::PUBLIC | BindingFlags::NON_PUBLIC | BindingFlags::INSTANCE | BindingFlags::STATIC
    }
}

impl BindingFlags {
    /// Returns true if a member with the given visibility and scope is selected
    #[must_use]
    pub fn selects(self, is_public: bool, is_static: bool) -> bool {
        self.selects_visibility(is_public)
            && self.contains(if is_static {
                BindingFlags::STATIC
            } else {
                BindingFlags::INSTANCE
            })
    }

    /// Returns true if a member with the given visibility is selected, scope ignored
    #[must_use]
    pub fn selects_visibility(self, is_public: bool) -> bool {
        self.contains(if is_public {
            BindingFlags::PUBLIC
        } else {
            BindingFlags::NON_PUBLIC
        })
    }
}

/// The kind of a single member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MemberType {
    /// A field
    Field,
    /// An instance constructor or type initializer
    Constructor,
    /// A method
    Method,
    /// A property
    Property,
    /// An event
    Event,
    /// A nested type
    NestedType,
}

impl MemberType {
    /// The `MemberKinds` bit of this kind
    #[must_use]
    pub fn mask(self) -> MemberKinds {
        match self {
            MemberType::Field => MemberKinds::FIELD,
            MemberType::Constructor => MemberKinds::CONSTRUCTOR,
            MemberType::Method => MemberKinds::METHOD,
            MemberType::Property => MemberKinds::PROPERTY,
            MemberType::Event => MemberKinds::EVENT,
            MemberType::NestedType => MemberKinds::NESTED_TYPE,
        }
    }
}

/// Any member of a type.
///
/// Two `Member`s are equal when they refer to the very same metadata row.
#[derive(Clone)]
pub enum Member {
    /// A field
    Field(FieldRc),
    /// An instance constructor or type initializer
    Constructor(MethodRc),
    /// A method
    Method(MethodRc),
    /// A property
    Property(PropertyRc),
    /// An event
    Event(EventRc),
    /// A nested type
    NestedType(CilTypeRc),
}

impl Member {
    /// The kind of this member
    #[must_use]
    pub fn member_type(&self) -> MemberType {
        match self {
            Member::Field(_) => MemberType::Field,
            Member::Constructor(_) => MemberType::Constructor,
            Member::Method(_) => MemberType::Method,
            Member::Property(_) => MemberType::Property,
            Member::Event(_) => MemberType::Event,
            Member::NestedType(_) => MemberType::NestedType,
        }
    }

    /// Token of the member's metadata row
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            Member::Field(field) => field.token,
            Member::Constructor(method) | Member::Method(method) => method.token,
            Member::Property(property) => property.token,
            Member::Event(event) => event.token,
            Member::NestedType(nested) => nested.token,
        }
    }

    /// Name of the member
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Member::Field(field) => field.name.clone(),
            Member::Constructor(method) | Member::Method(method) => method.name.clone(),
            Member::Property(property) => property.name.clone(),
            Member::Event(event) => event.name.clone(),
            Member::NestedType(nested) => nested.name.clone(),
        }
    }

    /// Returns true if the member is public
    #[must_use]
    pub fn is_public(&self) -> bool {
        match self {
            Member::Field(field) => field.is_public(),
            Member::Constructor(method) | Member::Method(method) => method.is_public(),
            Member::Property(property) => property.is_public(),
            Member::Event(event) => event.is_public(),
            Member::NestedType(nested) => nested.is_public(),
        }
    }

    /// Returns true if the member is static; nested types are never static
    #[must_use]
    pub fn is_static(&self) -> bool {
        match self {
            Member::Field(field) => field.is_static(),
            Member::Constructor(method) | Member::Method(method) => method.is_static(),
            Member::Property(property) => property.is_static(),
            Member::Event(event) => event.is_static(),
            Member::NestedType(_) => false,
        }
    }

    /// The type declaring this member (if still alive)
    #[must_use]
    pub fn declaring_type(&self) -> Option<CilTypeRc> {
        match self {
            Member::Field(field) => field.declaring_type.upgrade(),
            Member::Constructor(method) | Member::Method(method) => {
                method.declaring_type.upgrade()
            }
            Member::Property(property) => property.declaring_type.upgrade(),
            Member::Event(event) => event.declaring_type.upgrade(),
            Member::NestedType(nested) => nested.enclosing_type(),
        }
    }

    /// Returns true if this member can be seen from a derived type
    fn is_inheritable(&self) -> bool {
        let private = match self {
            Member::Field(field) => field.access().is_private(),
            Member::Method(method) => method.flags_access.is_private(),
            Member::Property(property) => property.access().is_private(),
            Member::Event(event) => {
                MemberAccess::most_visible(event.accessors().map(|m| m.flags_access)).is_private()
            }
            Member::Constructor(_) | Member::NestedType(_) => return false,
        };
        !private && !self.is_static()
    }

    /// Returns true if this member takes part in overriding
    fn is_virtual(&self) -> bool {
        match self {
            Member::Method(method) => method.is_virtual(),
            Member::Property(property) => property.accessors().any(|m| m.is_virtual()),
            Member::Event(event) => event.accessors().any(|m| m.is_virtual()),
            Member::Field(_) | Member::Constructor(_) | Member::NestedType(_) => false,
        }
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Member::Field(a), Member::Field(b)) => Arc::ptr_eq(a, b),
            (Member::Constructor(a), Member::Constructor(b))
            | (Member::Method(a), Member::Method(b)) => Arc::ptr_eq(a, b),
            (Member::Property(a), Member::Property(b)) => Arc::ptr_eq(a, b),
            (Member::Event(a), Member::Event(b)) => Arc::ptr_eq(a, b),
            (Member::NestedType(a), Member::NestedType(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token().hash(state);
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.member_type(), self.name(), self.token())
    }
}

impl CilType {
    /// Enumerate the members of this type selected by `kinds` and `bindings`
    ///
    /// An empty `kinds` mask, or a binding filter lacking a visibility or scope bit,
    /// yields nothing. Declared members come first, then inherited ones, see the module
    /// documentation for the exact order.
    ///
    /// ## Arguments
    /// * 'kinds'    - The member kinds to include
    /// * 'bindings' - Visibility / scope filter, see [`BindingFlags`]
    pub fn members(
        &self,
        kinds: MemberKinds,
        bindings: BindingFlags,
    ) -> std::vec::IntoIter<Member> {
        let mut members = Vec::new();
        self.collect_declared(kinds, &mut members);
        let mut overrides = Vec::new();
        Self::record_overrides(&members, &mut overrides);
        members.retain(|member| Self::binding_selects(bindings, member));

        if !bindings.contains(BindingFlags::DECLARED_ONLY) {
            for base in self.hierarchy() {
                let mut inherited = Vec::new();
                base.collect_declared(kinds, &mut inherited);
                members.extend(
                    inherited
                        .iter()
                        .filter(|member| {
                            member.is_inheritable()
                                && !Self::is_overridden(&overrides, member)
                                && Self::binding_selects(bindings, member)
                        })
                        .cloned(),
                );
                Self::record_overrides(&inherited, &mut overrides);
            }
        }

        members.into_iter()
    }

    /// Remember the virtual members of one level, before binding filters apply
    fn record_overrides(level: &[Member], overrides: &mut Vec<(MemberType, String)>) {
        overrides.extend(
            level
                .iter()
                .filter(|member| member.is_virtual())
                .map(|member| (member.member_type(), member.name())),
        );
    }

    fn is_overridden(overrides: &[(MemberType, String)], member: &Member) -> bool {
        member.is_virtual()
            && overrides
                .iter()
                .any(|(kind, name)| *kind == member.member_type() && *name == member.name())
    }

    fn binding_selects(bindings: BindingFlags, member: &Member) -> bool {
        match member {
            Member::NestedType(_) => bindings.selects_visibility(member.is_public()),
            _ => bindings.selects(member.is_public(), member.is_static()),
        }
    }

    fn collect_declared(&self, kinds: MemberKinds, out: &mut Vec<Member>) {
        if kinds.contains(MemberKinds::FIELD) {
            out.extend(
                self.fields
                    .iter()
                    .map(|(_, field)| Member::Field(field.clone())),
            );
        }
        if kinds.contains(MemberKinds::CONSTRUCTOR) {
            out.extend(
                self.methods
                    .iter()
                    .map(|(_, method)| method)
                    .filter(|method| method.is_constructor())
                    .map(|method| Member::Constructor(method.clone())),
            );
        }
        if kinds.contains(MemberKinds::METHOD) {
            out.extend(
                self.methods
                    .iter()
                    .map(|(_, method)| method)
                    .filter(|method| !method.is_constructor())
                    .map(|method| Member::Method(method.clone())),
            );
        }
        if kinds.contains(MemberKinds::PROPERTY) {
            out.extend(
                self.properties
                    .iter()
                    .map(|(_, property)| Member::Property(property.clone())),
            );
        }
        if kinds.contains(MemberKinds::EVENT) {
            out.extend(
                self.events
                    .iter()
                    .map(|(_, event)| Member::Event(event.clone())),
            );
        }
        if kinds.contains(MemberKinds::NESTED_TYPE) {
            out.extend(
                self.nested_types
                    .iter()
                    .filter_map(|(_, nested)| nested.upgrade())
                    .map(Member::NestedType),
            );
        }
    }
}
