use crate::metadata::{
    customattributes::AttributeType,
    members::FieldRc,
    query::HasCustomAttributes,
    typesystem::CilTypeRc,
};

/// A Rust enum mirrored by an enumeration of the metadata model.
///
/// Implementations name the enumeration's full name and map every Rust variant to the
/// symbolic name of the matching metadata constant. With `strum` this is one derive:
///
/// ```rust
/// use attrscope::metadata::members::MetadataEnum;
///
/// #[derive(strum::AsRefStr)]
/// enum Color {
///     Red,
///     Green,
/// }
///
/// impl MetadataEnum for Color {
///     const FULLNAME: &'static str = "Paint.Color";
///
///     fn variant_name(&self) -> &str {
///         self.as_ref()
///     }
/// }
///
/// assert_eq!(Color::Green.variant_name(), "Green");
/// ```
pub trait MetadataEnum {
    /// Full name of the enumeration type in the metadata model
    const FULLNAME: &'static str;

    /// Symbolic name of this value's constant
    fn variant_name(&self) -> &str;
}

/// A value of a metadata enumeration, identified by its symbolic name.
///
/// The value is an annotatable element: its custom attributes are those of the literal
/// field declaring the constant. A name that does not resolve to such a field carries no
/// attributes at all.
#[derive(Clone)]
pub struct EnumValue {
    enum_type: CilTypeRc,
    name: String,
}

impl EnumValue {
    /// Refer to the constant `name` of `enum_type`
    ///
    /// ## Arguments
    /// * '`enum_type`' - The enumeration declaring the constant
    /// * 'name'        - Symbolic name of the constant
    pub fn named(enum_type: &CilTypeRc, name: &str) -> Self {
        EnumValue {
            enum_type: enum_type.clone(),
            name: name.to_string(),
        }
    }

    /// Refer to the first constant of `enum_type` whose underlying value is `value`
    ///
    /// Returns `None` if no constant has that value or `enum_type` is not an enumeration.
    pub fn from_constant(enum_type: &CilTypeRc, value: i64) -> Option<Self> {
        let field = enum_type
            .enum_values()
            .find(|field| field.constant == Some(value))?;
        Some(EnumValue::named(enum_type, &field.name))
    }

    /// The enumeration this value belongs to
    pub fn enum_type(&self) -> &CilTypeRc {
        &self.enum_type
    }

    /// Symbolic name of this value
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the literal field declaring this value
    pub fn field(&self) -> Option<FieldRc> {
        self.resolve().cloned()
    }

    /// The underlying constant, if the name resolves
    pub fn constant(&self) -> Option<i64> {
        self.resolve().and_then(|field| field.constant)
    }

    /// First attribute of kind `K` on the declaration of this value
    pub fn custom_attribute<K: AttributeType>(&self) -> Option<K> {
        self.first_custom_attribute_of::<K>()
    }

    pub(crate) fn resolve(&self) -> Option<&FieldRc> {
        let field = if self.enum_type.is_enum() {
            self.enum_type
                .fields
                .iter()
                .map(|(_, field)| field)
                .find(|field| field.is_literal() && field.is_static() && field.name == self.name)
        } else {
            None
        };

        if field.is_none() {
            tracing::debug!(
                enum_type = %self.enum_type.fullname(),
                name = %self.name,
                "enum value does not resolve to a constant"
            );
        }
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{TypeBuilder, TypeRegistry};

    fn color(registry: &TypeRegistry) -> CilTypeRc {
        TypeBuilder::new(registry)
            .enumeration("Paint", "Color")
            .variant("Red", 0, |v| v)
            .variant("Green", 1, |v| v)
            .variant("Lime", 1, |v| v)
            .build()
            .unwrap()
    }

    #[test]
    fn test_named_resolution() {
        let registry = TypeRegistry::new("Enums").unwrap();
        let color = color(&registry);

        let green = EnumValue::named(&color, "Green");
        assert_eq!(green.name(), "Green");
        assert_eq!(green.constant(), Some(1));
        assert_eq!(green.field().unwrap().name, "Green");

        let missing = EnumValue::named(&color, "Blue");
        assert!(missing.field().is_none());
        assert!(missing.constant().is_none());

        let backing = EnumValue::named(&color, "value__");
        assert!(backing.field().is_none());
    }

    #[test]
    fn test_from_constant_picks_first_declared() {
        let registry = TypeRegistry::new("Enums").unwrap();
        let color = color(&registry);

        assert_eq!(EnumValue::from_constant(&color, 1).unwrap().name(), "Green");
        assert_eq!(EnumValue::from_constant(&color, 0).unwrap().name(), "Red");
        assert!(EnumValue::from_constant(&color, 7).is_none());
    }

    #[test]
    fn test_non_enum_type_never_resolves() {
        let registry = TypeRegistry::new("Enums").unwrap();
        let shape = TypeBuilder::new(&registry)
            .class("Geometry", "Shape")
            .field("Red", |f| f.public().with_static())
            .build()
            .unwrap();

        assert!(EnumValue::named(&shape, "Red").field().is_none());
        assert!(EnumValue::from_constant(&shape, 0).is_none());
    }
}
