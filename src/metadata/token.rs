//! Metadata tokens identifying rows of the metadata model.
//!
//! Every type, member and custom attribute registered through the builder receives a
//! [`Token`] whose high byte names the ECMA-335 table the row belongs to and whose low
//! 24 bits hold the 1-based row index. Tokens are unique within one
//! [`crate::metadata::typesystem::TypeRegistry`].

use std::fmt;
use std::hash::{Hash, Hasher};

/// ECMA-335 table identifiers used by the metadata model (§II.22).
#[allow(non_snake_case)]
pub mod TableId {
    /// `TypeRef` - types imported from other assemblies
    pub const TYPE_REF: u8 = 0x01;
    /// `TypeDef` - types declared in the current module
    pub const TYPE_DEF: u8 = 0x02;
    /// `Field`
    pub const FIELD: u8 = 0x04;
    /// `MethodDef`
    pub const METHOD_DEF: u8 = 0x06;
    /// `CustomAttribute`
    pub const CUSTOM_ATTRIBUTE: u8 = 0x0C;
    /// `Event`
    pub const EVENT: u8 = 0x14;
    /// `Property`
    pub const PROPERTY: u8 = 0x17;
}

/// A metadata token representing a reference to a metadata table entry.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Largest row index a token can hold
    pub const MAX_ROW: u32 = 0x00FF_FFFF;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table identifier and a row index
    ///
    /// ## Arguments
    /// * 'table' - The table identifier, see [`TableId`]
    /// * 'row'   - The 1-based row, saturated at [`Token::MAX_ROW`]
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | row.min(Self::MAX_ROW))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the token points into the `TypeDef` or `TypeRef` table
    #[must_use]
    pub fn is_type(&self) -> bool {
        matches!(self.table(), TableId::TYPE_DEF | TableId::TYPE_REF)
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
