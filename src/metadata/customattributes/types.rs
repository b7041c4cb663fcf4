//! CustomAttribute-specific types and data structures.
//!
//! This module contains the types used for representing attached custom attributes,
//! including argument values, named arguments, and the attribute instance itself which
//! ties a value to its attribute type (the *kind*).

use std::{fmt, sync::Arc};

use crate::metadata::{
    customattributes::kind,
    token::Token,
    typesystem::{CilType, CilTypeRc, CilTypeRef},
};

/// A reference-counted pointer to a `CustomAttribute`
pub type CustomAttributeRc = Arc<CustomAttribute>;
/// A vector that holds a list of `CustomAttribute` instances for storage on parent objects
pub type CustomAttributeList = Arc<boxcar::Vec<CustomAttributeRc>>;

/// A single custom attribute attached to a type, member or enum value.
///
/// The attribute type is held as a weak [`CilTypeRef`], attribute classes are commonly
/// annotated with attributes of their own kind and a strong reference would leak.
pub struct CustomAttribute {
    /// Token of the `CustomAttribute` row
    pub token: Token,
    /// The attribute class this instance was created from
    pub kind: CilTypeRef,
    /// Constructor and named arguments
    pub value: CustomAttributeValue,
}

impl CustomAttribute {
    /// Create a new custom attribute instance of the given kind
    pub fn new(token: Token, kind: &CilTypeRc, value: CustomAttributeValue) -> Self {
        CustomAttribute {
            token,
            kind: CilTypeRef::new(kind),
            value,
        }
    }

    /// Access the attribute type, if it is still alive
    #[must_use]
    pub fn kind(&self) -> Option<CilTypeRc> {
        self.kind.upgrade()
    }

    /// Full name of the attribute type, if it is still alive
    #[must_use]
    pub fn kind_fullname(&self) -> Option<String> {
        self.kind().map(|k| k.fullname())
    }

    /// Returns true if this instance is of `queried` kind or of a kind derived from it
    #[must_use]
    pub fn is_kind(&self, queried: &CilType) -> bool {
        self.kind()
            .is_some_and(|instance| kind::matches(&instance, queried))
    }

    /// Returns true if this instance's kind is `fullname` or derives from it
    #[must_use]
    pub fn is_kind_named(&self, fullname: &str) -> bool {
        self.kind()
            .is_some_and(|instance| kind::matches_fullname(&instance, fullname))
    }

    /// Positional constructor argument at `index`
    #[must_use]
    pub fn fixed_arg(&self, index: usize) -> Option<&CustomAttributeArgument> {
        self.value.fixed_args.get(index)
    }

    /// Value of the named field or property argument `name`
    #[must_use]
    pub fn named_arg(&self, name: &str) -> Option<&CustomAttributeArgument> {
        self.value
            .named_args
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }
}

impl fmt::Debug for CustomAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAttribute")
            .field("token", &self.token)
            .field("kind", &self.kind_fullname())
            .field("value", &self.value)
            .finish()
    }
}

/// Represents a custom attribute value with arguments and named arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomAttributeValue {
    /// Fixed arguments from the constructor signature
    pub fixed_args: Vec<CustomAttributeArgument>,
    /// Named arguments (fields and properties)
    pub named_args: Vec<CustomAttributeNamedArgument>,
}

impl CustomAttributeValue {
    /// Append a positional constructor argument
    #[must_use]
    pub fn fixed(mut self, value: CustomAttributeArgument) -> Self {
        self.fixed_args.push(value);
        self
    }

    /// Append a named field argument
    #[must_use]
    pub fn field(mut self, name: &str, value: CustomAttributeArgument) -> Self {
        self.named_args.push(CustomAttributeNamedArgument {
            is_field: true,
            name: name.to_string(),
            arg_type: value.type_name().to_string(),
            value,
        });
        self
    }

    /// Append a named property argument
    #[must_use]
    pub fn property(mut self, name: &str, value: CustomAttributeArgument) -> Self {
        self.named_args.push(CustomAttributeNamedArgument {
            is_field: false,
            name: name.to_string(),
            arg_type: value.type_name().to_string(),
            value,
        });
        self
    }
}

/// Represents a single custom attribute argument value
#[derive(Debug, Clone, PartialEq)]
pub enum CustomAttributeArgument {
    /// Boolean value
    Bool(bool),
    /// Character value (16-bit Unicode)
    Char(char),
    /// Signed 8-bit integer
    I1(i8),
    /// Unsigned 8-bit integer
    U1(u8),
    /// Signed 16-bit integer
    I2(i16),
    /// Unsigned 16-bit integer
    U2(u16),
    /// Signed 32-bit integer
    I4(i32),
    /// Unsigned 32-bit integer
    U4(u32),
    /// Signed 64-bit integer
    I8(i64),
    /// Unsigned 64-bit integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// UTF-8 string, `None` for a null string
    String(Option<String>),
    /// Type reference (as full name)
    Type(String),
    /// Array of arguments
    Array(Vec<CustomAttributeArgument>),
    /// Enum value (enum type full name + underlying value)
    Enum(String, Box<CustomAttributeArgument>),
}

impl CustomAttributeArgument {
    /// The serialization type name of this argument (`System.Int32`, `System.String`, ...)
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            CustomAttributeArgument::Bool(_) => "System.Boolean",
            CustomAttributeArgument::Char(_) => "System.Char",
            CustomAttributeArgument::I1(_) => "System.SByte",
            CustomAttributeArgument::U1(_) => "System.Byte",
            CustomAttributeArgument::I2(_) => "System.Int16",
            CustomAttributeArgument::U2(_) => "System.UInt16",
            CustomAttributeArgument::I4(_) => "System.Int32",
            CustomAttributeArgument::U4(_) => "System.UInt32",
            CustomAttributeArgument::I8(_) => "System.Int64",
            CustomAttributeArgument::U8(_) => "System.UInt64",
            CustomAttributeArgument::R4(_) => "System.Single",
            CustomAttributeArgument::R8(_) => "System.Double",
            CustomAttributeArgument::String(_) => "System.String",
            CustomAttributeArgument::Type(_) => "System.Type",
            CustomAttributeArgument::Array(_) => "System.Array",
            CustomAttributeArgument::Enum(name, _) => name,
        }
    }

    /// The argument as a string slice, if it is a non-null string or a type name
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CustomAttributeArgument::String(Some(value)) | CustomAttributeArgument::Type(value) => {
                Some(value)
            }
            _ => None,
        }
    }

    /// The argument as a boolean
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CustomAttributeArgument::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The argument widened to `i64`, for all integer kinds and enums that fit
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CustomAttributeArgument::I1(v) => Some(i64::from(*v)),
            CustomAttributeArgument::U1(v) => Some(i64::from(*v)),
            CustomAttributeArgument::I2(v) => Some(i64::from(*v)),
            CustomAttributeArgument::U2(v) => Some(i64::from(*v)),
            CustomAttributeArgument::I4(v) => Some(i64::from(*v)),
            CustomAttributeArgument::U4(v) => Some(i64::from(*v)),
            CustomAttributeArgument::I8(v) => Some(*v),
            CustomAttributeArgument::U8(v) => i64::try_from(*v).ok(),
            CustomAttributeArgument::Char(v) => Some(i64::from(u32::from(*v))),
            CustomAttributeArgument::Enum(_, inner) => inner.as_i64(),
            _ => None,
        }
    }
}

/// Represents a named argument (field or property) in a custom attribute
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttributeNamedArgument {
    /// Whether this is a field (true) or property (false)
    pub is_field: bool,
    /// Name of the field or property
    pub name: String,
    /// Type of the argument
    pub arg_type: String,
    /// Value of the argument
    pub value: CustomAttributeArgument,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_builder_records_named_types() {
        let value = CustomAttributeValue::default()
            .fixed(CustomAttributeArgument::String(Some("radius".to_string())))
            .property("Order", CustomAttributeArgument::I4(3))
            .field("Hidden", CustomAttributeArgument::Bool(true));

        assert_eq!(value.fixed_args.len(), 1);
        assert_eq!(value.named_args.len(), 2);
        assert!(!value.named_args[0].is_field);
        assert_eq!(value.named_args[0].arg_type, "System.Int32");
        assert!(value.named_args[1].is_field);
        assert_eq!(value.named_args[1].arg_type, "System.Boolean");
    }

    #[test]
    fn test_argument_accessors() {
        assert_eq!(
            CustomAttributeArgument::String(Some("x".to_string())).as_str(),
            Some("x")
        );
        assert_eq!(CustomAttributeArgument::String(None).as_str(), None);
        assert_eq!(
            CustomAttributeArgument::Type("System.Int32".to_string()).as_str(),
            Some("System.Int32")
        );
        assert_eq!(CustomAttributeArgument::Bool(false).as_bool(), Some(false));
        assert_eq!(CustomAttributeArgument::U2(7).as_i64(), Some(7));
        assert_eq!(CustomAttributeArgument::U8(u64::MAX).as_i64(), None);
        assert_eq!(
            CustomAttributeArgument::Enum(
                "Sample.Color".to_string(),
                Box::new(CustomAttributeArgument::I4(2))
            )
            .as_i64(),
            Some(2)
        );
        assert_eq!(CustomAttributeArgument::R8(1.5).as_i64(), None);
    }

    #[test]
    fn test_enum_argument_type_name() {
        let arg = CustomAttributeArgument::Enum(
            "Sample.Color".to_string(),
            Box::new(CustomAttributeArgument::I4(1)),
        );
        assert_eq!(arg.type_name(), "Sample.Color");
    }
}
