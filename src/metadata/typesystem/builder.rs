//! Builder for type definitions of the metadata model.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for declaring
//! classes, value types, interfaces, enumerations and attribute classes together with their
//! members and the custom attributes attached to them. It is the only writer of a
//! [`TypeRegistry`]: everything is validated and assembled in [`TypeBuilder::build`], which
//! registers the finished type.
//!
//! Member declarations take a closure receiving a member builder ([`FieldBuilder`],
//! [`MethodBuilder`], [`PropertyBuilder`], [`EventBuilder`]). Members default to private
//! instance members.
//!
//! # Example
//!
//! ```rust
//! use attrscope::metadata::{
//!     customattributes::{CustomAttributeArgument, CustomAttributeValue},
//!     typesystem::{TypeBuilder, TypeRegistry},
//! };
//!
//! let registry = TypeRegistry::new("Sample")?;
//! let display = TypeBuilder::new(&registry)
//!     .attribute_class("Sample", "DisplayAttribute")
//!     .public()
//!     .build()?;
//!
//! let shape = TypeBuilder::new(&registry)
//!     .class("Sample", "Shape")
//!     .public()
//!     .field("radius", |f| {
//!         f.public().attribute_with(
//!             &display,
//!             CustomAttributeValue::default().fixed(CustomAttributeArgument::String(Some("Radius".into()))),
//!         )
//!     })
//!     .property("Label", |p| p.public().attribute(&display))
//!     .build()?;
//!
//! assert_eq!(shape.fields.count(), 1);
//! assert_eq!(shape.properties.count(), 1);
//! # Ok::<(), attrscope::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    metadata::{
        customattributes::{CustomAttribute, CustomAttributeList, CustomAttributeValue},
        members::{
            Event, Field, FieldAttributes, MemberAccess, Method, MethodModifiers, MethodRc,
            Property, CCTOR_NAME, CTOR_NAME,
        },
        token::TableId,
        typesystem::{
            CilFlavor, CilType, CilTypeRc, CilTypeRef, TypeAttributes, TypeRegistry, TypeSource,
        },
    },
    Error, Result,
};

/// Name of the instance field holding the underlying value of an enumeration
const ENUM_VALUE_FIELD: &str = "value__";

/// An attribute waiting to be attached once its target exists
struct PendingAttribute {
    kind: CilTypeRc,
    value: CustomAttributeValue,
}

/// Implements `attribute` and `attribute_with` for builders holding `attributes`
macro_rules! attribute_setters {
    () => {
        /// Attach an attribute of class `kind` without arguments
        ///
        /// ## Arguments
        /// * 'kind' - The attribute class, must derive from `System.Attribute`
        #[must_use]
        pub fn attribute(self, kind: &CilTypeRc) -> Self {
            self.attribute_with(kind, CustomAttributeValue::default())
        }

        /// Attach an attribute of class `kind` with constructor and named arguments
        ///
        /// ## Arguments
        /// * 'kind'  - The attribute class, must derive from `System.Attribute`
        /// * 'value' - The arguments of this instance
        #[must_use]
        pub fn attribute_with(mut self, kind: &CilTypeRc, value: CustomAttributeValue) -> Self {
            self.attributes.push(PendingAttribute {
                kind: kind.clone(),
                value,
            });
            self
        }
    };
}

/// Push the pending attributes onto `target`, allocating one token each
fn attach(registry: &TypeRegistry, target: &CustomAttributeList, attributes: Vec<PendingAttribute>) {
    for pending in attributes {
        let token = registry.next_token(TableId::CUSTOM_ATTRIBUTE);
        target.push(Arc::new(CustomAttribute::new(
            token,
            &pending.kind,
            pending.value,
        )));
    }
}

/// Declares a field; private instance field unless configured otherwise
pub struct FieldBuilder {
    name: String,
    flags: u32,
    constant: Option<i64>,
    attributes: Vec<PendingAttribute>,
}

impl FieldBuilder {
    fn new(name: &str) -> Self {
        FieldBuilder {
            name: name.to_string(),
            flags: FieldAttributes::PRIVATE,
            constant: None,
            attributes: Vec::new(),
        }
    }

    fn literal(name: &str, value: i64) -> Self {
        FieldBuilder {
            name: name.to_string(),
            flags: FieldAttributes::PUBLIC
                | FieldAttributes::STATIC
                | FieldAttributes::LITERAL
                | FieldAttributes::HAS_DEFAULT,
            constant: Some(value),
            attributes: Vec::new(),
        }
    }

    /// Set the accessibility
    #[must_use]
    pub fn access(mut self, access: MemberAccess) -> Self {
        self.flags = (self.flags & !FieldAttributes::FIELD_ACCESS_MASK) | access.bits();
        self
    }

    /// Make the field public
    #[must_use]
    pub fn public(self) -> Self {
        self.access(MemberAccess::Public)
    }

    /// Make the field private
    #[must_use]
    pub fn private(self) -> Self {
        self.access(MemberAccess::Private)
    }

    /// Make the field visible to the declaring type and its sub-types
    #[must_use]
    pub fn family(self) -> Self {
        self.access(MemberAccess::Family)
    }

    /// Make the field visible within the assembly
    #[must_use]
    pub fn assembly(self) -> Self {
        self.access(MemberAccess::Assembly)
    }

    /// Make the field static
    #[must_use]
    pub fn with_static(mut self) -> Self {
        self.flags |= FieldAttributes::STATIC;
        self
    }

    /// Make the field assignable during initialization only
    #[must_use]
    pub fn init_only(mut self) -> Self {
        self.flags |= FieldAttributes::INIT_ONLY;
        self
    }

    /// Add raw `FieldAttributes` bits
    #[must_use]
    pub fn flags(mut self, flags: u32) -> Self {
        self.flags |= flags;
        self
    }

    attribute_setters!();

    fn finish(self, registry: &TypeRegistry, declaring_type: &CilTypeRc) {
        let field = Arc::new(Field::new(
            registry.next_token(TableId::FIELD),
            self.name,
            self.flags,
            self.constant,
            declaring_type,
        ));
        attach(registry, &field.custom_attributes, self.attributes);
        declaring_type.fields.push(field);
    }
}

/// Declares a method; private instance method unless configured otherwise
pub struct MethodBuilder {
    name: String,
    access: MemberAccess,
    modifiers: MethodModifiers,
    attributes: Vec<PendingAttribute>,
}

impl MethodBuilder {
    fn new(name: &str, modifiers: MethodModifiers) -> Self {
        MethodBuilder {
            name: name.to_string(),
            access: MemberAccess::Private,
            modifiers,
            attributes: Vec::new(),
        }
    }

    /// Set the accessibility
    #[must_use]
    pub fn access(mut self, access: MemberAccess) -> Self {
        self.access = access;
        self
    }

    /// Make the method public
    #[must_use]
    pub fn public(self) -> Self {
        self.access(MemberAccess::Public)
    }

    /// Make the method private
    #[must_use]
    pub fn private(self) -> Self {
        self.access(MemberAccess::Private)
    }

    /// Make the method visible to the declaring type and its sub-types
    #[must_use]
    pub fn family(self) -> Self {
        self.access(MemberAccess::Family)
    }

    /// Make the method visible within the assembly
    #[must_use]
    pub fn assembly(self) -> Self {
        self.access(MemberAccess::Assembly)
    }

    /// Make the method static
    #[must_use]
    pub fn with_static(mut self) -> Self {
        self.modifiers |= MethodModifiers::STATIC;
        self
    }

    /// Make the method virtual
    #[must_use]
    pub fn virtual_method(mut self) -> Self {
        self.modifiers |= MethodModifiers::VIRTUAL;
        self
    }

    /// Make the method abstract (and virtual)
    #[must_use]
    pub fn abstract_method(mut self) -> Self {
        self.modifiers |= MethodModifiers::ABSTRACT | MethodModifiers::VIRTUAL;
        self
    }

    /// Mark the method as special
    #[must_use]
    pub fn special_name(mut self) -> Self {
        self.modifiers |= MethodModifiers::SPECIAL_NAME;
        self
    }

    attribute_setters!();

    fn finish(self, registry: &TypeRegistry, declaring_type: &CilTypeRc) -> MethodRc {
        let method = Arc::new(Method::new(
            registry.next_token(TableId::METHOD_DEF),
            self.name,
            self.access,
            self.modifiers,
            declaring_type,
        ));
        attach(registry, &method.custom_attributes, self.attributes);
        declaring_type.methods.push(method.clone());
        method
    }
}

/// Declares a property with a `get_` and a `set_` accessor
///
/// Visibility and scope setters apply to both accessors; use [`PropertyBuilder::getter`]
/// and [`PropertyBuilder::setter`] to configure one of them.
pub struct PropertyBuilder {
    name: String,
    flags: u32,
    getter: Option<MethodBuilder>,
    setter: Option<MethodBuilder>,
    attributes: Vec<PendingAttribute>,
}

impl PropertyBuilder {
    fn new(name: &str) -> Self {
        PropertyBuilder {
            name: name.to_string(),
            flags: 0,
            getter: Some(Self::accessor("get", name)),
            setter: Some(Self::accessor("set", name)),
            attributes: Vec::new(),
        }
    }

    fn accessor(prefix: &str, name: &str) -> MethodBuilder {
        MethodBuilder::new(
            &format!("{prefix}_{name}"),
            MethodModifiers::SPECIAL_NAME | MethodModifiers::HIDE_BY_SIG,
        )
    }

    fn map_accessors(mut self, apply: impl Fn(MethodBuilder) -> MethodBuilder) -> Self {
        self.getter = self.getter.map(&apply);
        self.setter = self.setter.map(&apply);
        self
    }

    /// Make both accessors public
    #[must_use]
    pub fn public(self) -> Self {
        self.map_accessors(MethodBuilder::public)
    }

    /// Make both accessors private
    #[must_use]
    pub fn private(self) -> Self {
        self.map_accessors(MethodBuilder::private)
    }

    /// Make both accessors visible to the declaring type and its sub-types
    #[must_use]
    pub fn family(self) -> Self {
        self.map_accessors(MethodBuilder::family)
    }

    /// Make both accessors static
    #[must_use]
    pub fn with_static(self) -> Self {
        self.map_accessors(MethodBuilder::with_static)
    }

    /// Make both accessors virtual
    #[must_use]
    pub fn virtual_accessors(self) -> Self {
        self.map_accessors(MethodBuilder::virtual_method)
    }

    /// Configure the getter, declaring it if it was removed
    #[must_use]
    pub fn getter<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        let getter = self
            .getter
            .take()
            .unwrap_or_else(|| Self::accessor("get", &self.name));
        self.getter = Some(configure(getter));
        self
    }

    /// Configure the setter, declaring it if it was removed
    #[must_use]
    pub fn setter<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        let setter = self
            .setter
            .take()
            .unwrap_or_else(|| Self::accessor("set", &self.name));
        self.setter = Some(configure(setter));
        self
    }

    /// Drop the setter
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.setter = None;
        self
    }

    /// Add raw `PropertyAttributes` bits
    #[must_use]
    pub fn flags(mut self, flags: u32) -> Self {
        self.flags |= flags;
        self
    }

    attribute_setters!();

    fn pending(&self) -> impl Iterator<Item = &PendingAttribute> {
        self.attributes.iter().chain(
            self.getter
                .iter()
                .chain(self.setter.iter())
                .flat_map(|accessor| accessor.attributes.iter()),
        )
    }

    fn finish(self, registry: &TypeRegistry, declaring_type: &CilTypeRc) {
        let getter = self
            .getter
            .map(|getter| getter.finish(registry, declaring_type));
        let setter = self
            .setter
            .map(|setter| setter.finish(registry, declaring_type));
        let property = Arc::new(Property::new(
            registry.next_token(TableId::PROPERTY),
            self.name,
            self.flags,
            declaring_type,
            getter,
            setter,
        ));
        attach(registry, &property.custom_attributes, self.attributes);
        declaring_type.properties.push(property);
    }
}

/// Declares an event with an `add_` and a `remove_` accessor
///
/// Visibility and scope setters apply to both accessors.
pub struct EventBuilder {
    name: String,
    flags: u32,
    on_add: MethodBuilder,
    on_remove: MethodBuilder,
    attributes: Vec<PendingAttribute>,
}

impl EventBuilder {
    fn new(name: &str) -> Self {
        let accessor = |prefix: &str| {
            MethodBuilder::new(
                &format!("{prefix}_{name}"),
                MethodModifiers::SPECIAL_NAME | MethodModifiers::HIDE_BY_SIG,
            )
        };
        EventBuilder {
            name: name.to_string(),
            flags: 0,
            on_add: accessor("add"),
            on_remove: accessor("remove"),
            attributes: Vec::new(),
        }
    }

    fn map_accessors(mut self, apply: impl Fn(MethodBuilder) -> MethodBuilder) -> Self {
        self.on_add = apply(self.on_add);
        self.on_remove = apply(self.on_remove);
        self
    }

    /// Make both accessors public
    #[must_use]
    pub fn public(self) -> Self {
        self.map_accessors(MethodBuilder::public)
    }

    /// Make both accessors private
    #[must_use]
    pub fn private(self) -> Self {
        self.map_accessors(MethodBuilder::private)
    }

    /// Make both accessors visible to the declaring type and its sub-types
    #[must_use]
    pub fn family(self) -> Self {
        self.map_accessors(MethodBuilder::family)
    }

    /// Make both accessors static
    #[must_use]
    pub fn with_static(self) -> Self {
        self.map_accessors(MethodBuilder::with_static)
    }

    /// Make both accessors virtual
    #[must_use]
    pub fn virtual_accessors(self) -> Self {
        self.map_accessors(MethodBuilder::virtual_method)
    }

    /// Configure the `add_` accessor
    #[must_use]
    pub fn on_add<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        self.on_add = configure(self.on_add);
        self
    }

    /// Configure the `remove_` accessor
    #[must_use]
    pub fn on_remove<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        self.on_remove = configure(self.on_remove);
        self
    }

    attribute_setters!();

    fn pending(&self) -> impl Iterator<Item = &PendingAttribute> {
        self.attributes
            .iter()
            .chain(self.on_add.attributes.iter())
            .chain(self.on_remove.attributes.iter())
    }

    fn finish(self, registry: &TypeRegistry, declaring_type: &CilTypeRc) {
        let on_add = self.on_add.finish(registry, declaring_type);
        let on_remove = self.on_remove.finish(registry, declaring_type);
        let event = Arc::new(Event::new(
            registry.next_token(TableId::EVENT),
            self.name,
            self.flags,
            declaring_type,
            Some(on_add),
            Some(on_remove),
        ));
        attach(registry, &event.custom_attributes, self.attributes);
        declaring_type.events.push(event);
    }
}

/// Provides a fluent API for declaring a type and registering it
pub struct TypeBuilder<'a> {
    /// Registry receiving the type
    registry: &'a TypeRegistry,
    flavor: CilFlavor,
    namespace: String,
    name: String,
    base: Option<CilTypeRc>,
    enclosing: Option<CilTypeRc>,
    public: bool,
    flags: TypeAttributes,
    attributes: Vec<PendingAttribute>,
    fields: Vec<FieldBuilder>,
    declares_variants: bool,
    methods: Vec<MethodBuilder>,
    properties: Vec<PropertyBuilder>,
    events: Vec<EventBuilder>,
}

impl<'a> TypeBuilder<'a> {
    /// Create a new builder registering into `registry`
    ///
    /// ## Arguments
    /// * 'registry' - The type registry to use
    pub fn new(registry: &'a TypeRegistry) -> Self {
        TypeBuilder {
            registry,
            flavor: CilFlavor::Class,
            namespace: String::new(),
            name: String::new(),
            base: Some(registry.object_type()),
            enclosing: None,
            public: false,
            flags: TypeAttributes::empty(),
            attributes: Vec::new(),
            fields: Vec::new(),
            declares_variants: false,
            methods: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
        }
    }

    fn start(
        mut self,
        flavor: CilFlavor,
        namespace: &str,
        name: &str,
        base: Option<CilTypeRc>,
        flags: TypeAttributes,
    ) -> Self {
        self.flavor = flavor;
        self.namespace = namespace.to_string();
        self.name = name.to_string();
        self.base = base;
        self.flags |= flags;
        self
    }

    /// Start building a class deriving from `System.Object`
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace for a class type (can be empty)
    /// * 'name'      - Name for a class type
    #[must_use]
    pub fn class(self, namespace: &str, name: &str) -> Self {
        let base = self.registry.object_type();
        self.start(CilFlavor::Class, namespace, name, Some(base), TypeAttributes::empty())
    }

    /// Start building a sealed value type deriving from `System.ValueType`
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace for a value type (can be empty)
    /// * 'name'      - Name for a value type
    #[must_use]
    pub fn value_type(self, namespace: &str, name: &str) -> Self {
        let base = self.registry.value_type_base();
        self.start(CilFlavor::ValueType, namespace, name, Some(base), TypeAttributes::SEALED)
    }

    /// Start building an interface, which has no base type
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace for an interface (can be empty)
    /// * 'name'      - Name for an interface
    #[must_use]
    pub fn interface(self, namespace: &str, name: &str) -> Self {
        self.start(
            CilFlavor::Interface,
            namespace,
            name,
            None,
            TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT,
        )
    }

    /// Start building a sealed enumeration deriving from `System.Enum`
    ///
    /// The instance field `value__` holding the underlying value is declared automatically;
    /// the named constants are declared with [`TypeBuilder::variant`].
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace for an enumeration (can be empty)
    /// * 'name'      - Name for an enumeration
    #[must_use]
    pub fn enumeration(self, namespace: &str, name: &str) -> Self {
        let base = self.registry.enum_base();
        self.start(CilFlavor::Enum, namespace, name, Some(base), TypeAttributes::SEALED)
    }

    /// Start building an attribute class deriving from `System.Attribute`
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace for the attribute class (can be empty)
    /// * 'name'      - Name for the attribute class
    #[must_use]
    pub fn attribute_class(self, namespace: &str, name: &str) -> Self {
        let base = self.registry.attribute_type();
        self.start(CilFlavor::Class, namespace, name, Some(base), TypeAttributes::empty())
    }

    /// Set the base type
    ///
    /// ## Arguments
    /// * 'base' - The base type, must be registered in the same registry
    #[must_use]
    pub fn extends(mut self, base: &CilTypeRc) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Nest this type in `enclosing`
    ///
    /// ## Arguments
    /// * 'enclosing' - The enclosing type, must be registered in the same registry
    #[must_use]
    pub fn nested_in(mut self, enclosing: &CilTypeRc) -> Self {
        self.enclosing = Some(enclosing.clone());
        self
    }

    /// Make the type public (nested public for nested types)
    #[must_use]
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    /// Make the type sealed
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.flags |= TypeAttributes::SEALED;
        self
    }

    /// Make the type abstract
    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.flags |= TypeAttributes::ABSTRACT;
        self
    }

    /// Add raw `TypeAttributes` bits (visibility bits are ignored)
    #[must_use]
    pub fn flags(mut self, flags: TypeAttributes) -> Self {
        self.flags |= flags.with_visibility(TypeAttributes::empty());
        self
    }

    attribute_setters!();

    /// Declare a field
    ///
    /// ## Arguments
    /// * 'name'      - Name of the field
    /// * 'configure' - Configures the field, see [`FieldBuilder`]
    #[must_use]
    pub fn field<F>(mut self, name: &str, configure: F) -> Self
    where
        F: FnOnce(FieldBuilder) -> FieldBuilder,
    {
        self.fields.push(configure(FieldBuilder::new(name)));
        self
    }

    /// Declare a named constant of an enumeration
    ///
    /// The constant is a public static literal field carrying `value`.
    ///
    /// ## Arguments
    /// * 'name'      - Symbolic name of the constant
    /// * 'value'     - Underlying value of the constant
    /// * 'configure' - Configures the field, typically attaching attributes
    #[must_use]
    pub fn variant<F>(mut self, name: &str, value: i64, configure: F) -> Self
    where
        F: FnOnce(FieldBuilder) -> FieldBuilder,
    {
        self.declares_variants = true;
        self.fields.push(configure(FieldBuilder::literal(name, value)));
        self
    }

    /// Declare a method
    ///
    /// ## Arguments
    /// * 'name'      - Name of the method
    /// * 'configure' - Configures the method, see [`MethodBuilder`]
    #[must_use]
    pub fn method<F>(mut self, name: &str, configure: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        self.methods.push(configure(MethodBuilder::new(
            name,
            MethodModifiers::HIDE_BY_SIG,
        )));
        self
    }

    /// Declare an instance constructor (`.ctor`)
    ///
    /// ## Arguments
    /// * 'configure' - Configures the constructor, see [`MethodBuilder`]
    #[must_use]
    pub fn constructor<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        self.methods.push(configure(MethodBuilder::new(
            CTOR_NAME,
            MethodModifiers::SPECIAL_NAME
                | MethodModifiers::RTSPECIAL_NAME
                | MethodModifiers::HIDE_BY_SIG,
        )));
        self
    }

    /// Declare the type initializer (`.cctor`)
    ///
    /// ## Arguments
    /// * 'configure' - Configures the initializer, see [`MethodBuilder`]
    #[must_use]
    pub fn type_initializer<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        self.methods.push(configure(MethodBuilder::new(
            CCTOR_NAME,
            MethodModifiers::STATIC
                | MethodModifiers::SPECIAL_NAME
                | MethodModifiers::RTSPECIAL_NAME
                | MethodModifiers::HIDE_BY_SIG,
        )));
        self
    }

    /// Declare a property with getter and setter
    ///
    /// ## Arguments
    /// * 'name'      - Name of the property
    /// * 'configure' - Configures the property, see [`PropertyBuilder`]
    #[must_use]
    pub fn property<F>(mut self, name: &str, configure: F) -> Self
    where
        F: FnOnce(PropertyBuilder) -> PropertyBuilder,
    {
        self.properties.push(configure(PropertyBuilder::new(name)));
        self
    }

    /// Declare an event with `add_` and `remove_` accessors
    ///
    /// ## Arguments
    /// * 'name'      - Name of the event
    /// * 'configure' - Configures the event, see [`EventBuilder`]
    #[must_use]
    pub fn event<F>(mut self, name: &str, configure: F) -> Self
    where
        F: FnOnce(EventBuilder) -> EventBuilder,
    {
        self.events.push(configure(EventBuilder::new(name)));
        self
    }

    /// Full name the type will be registered under
    fn fullname(&self) -> String {
        if let Some(enclosing) = &self.enclosing {
            format!("{}+{}", enclosing.fullname(), self.name)
        } else if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    fn pending_attributes(&self) -> impl Iterator<Item = &PendingAttribute> {
        self.attributes
            .iter()
            .chain(self.fields.iter().flat_map(|f| f.attributes.iter()))
            .chain(self.methods.iter().flat_map(|m| m.attributes.iter()))
            .chain(self.properties.iter().flat_map(|p| p.pending()))
            .chain(self.events.iter().flat_map(|e| e.pending()))
    }

    fn validate(&self) -> Result<()> {
        let mut member_names = self
            .fields
            .iter()
            .map(|f| &f.name)
            .chain(self.methods.iter().map(|m| &m.name))
            .chain(self.properties.iter().map(|p| &p.name))
            .chain(self.events.iter().map(|e| &e.name));
        if self.name.is_empty() || member_names.any(|name| name.is_empty()) {
            return Err(Error::Empty);
        }

        if self.declares_variants && self.flavor != CilFlavor::Enum {
            return Err(malformed_error!(
                "{} declares enum constants but is not an enumeration",
                self.fullname()
            ));
        }

        for parent in self.base.iter().chain(self.enclosing.iter()) {
            if !self.registry.owns(parent) {
                return Err(Error::TypeMissingParent);
            }
        }

        let attribute = self.registry.attribute_type();
        for pending in self.pending_attributes() {
            if !Arc::ptr_eq(&pending.kind, &attribute) && !pending.kind.is_attribute() {
                return Err(Error::TypeError(format!(
                    "{} is not an attribute class",
                    pending.kind.fullname()
                )));
            }
        }

        let fullname = self.fullname();
        if self.registry.get_by_fullname(&fullname).is_some() {
            return Err(Error::DuplicateType(fullname));
        }

        Ok(())
    }

    fn type_flags(&self) -> TypeAttributes {
        let visibility = match (self.enclosing.is_some(), self.public) {
            (false, false) => TypeAttributes::empty(),
            (false, true) => TypeAttributes::PUBLIC,
            (true, false) => TypeAttributes::NESTED_PRIVATE,
            (true, true) => TypeAttributes::NESTED_PUBLIC,
        };
        self.flags.with_visibility(visibility)
    }

    /// Validate the declaration, create the type with its members and register it
    ///
    /// # Errors
    /// - [`Error::Empty`] if the type or one of its members has no name
    /// - [`Error::Malformed`] if enum constants are declared on a non-enumeration
    /// - [`Error::TypeMissingParent`] if the base or enclosing type belongs to another registry
    /// - [`Error::TypeError`] if an attached kind is not an attribute class
    /// - [`Error::DuplicateType`] if the full name is already registered
    pub fn build(self) -> Result<CilTypeRc> {
        if let Err(error) = self.validate() {
            tracing::debug!(name = %self.name, %error, "rejected type declaration");
            return Err(error);
        }

        let registry = self.registry;
        let flags = self.type_flags();
        let new_type = Arc::new(CilType::new(
            registry.next_token(TableId::TYPE_DEF),
            self.flavor,
            self.namespace,
            self.name,
            TypeSource::CurrentModule,
            self.base.as_ref(),
            flags,
        ));
        if let Some(enclosing) = &self.enclosing {
            new_type.set_enclosing_type(enclosing);
        }

        attach(registry, &new_type.custom_attributes, self.attributes);

        if new_type.is_enum() {
            FieldBuilder::new(ENUM_VALUE_FIELD)
                .public()
                .flags(FieldAttributes::SPECIAL_NAME | FieldAttributes::RTSPECIAL_NAME)
                .finish(registry, &new_type);
        }
        for field in self.fields {
            field.finish(registry, &new_type);
        }
        for method in self.methods {
            method.finish(registry, &new_type);
        }
        for property in self.properties {
            property.finish(registry, &new_type);
        }
        for event in self.events {
            event.finish(registry, &new_type);
        }

        registry.insert(&new_type)?;
        if let Some(enclosing) = &self.enclosing {
            enclosing.nested_types.push(CilTypeRef::new(&new_type));
        }

        Ok(new_type)
    }
}
