use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors only ever originate from *building* the metadata model. The attribute queries in
/// [`crate::metadata::query`] never fail: a missing attribute, member or type is reported as
/// `None`, `false` or an empty sequence.
///
/// # Error Categories
///
/// ## Model Construction Errors
/// - [`Error::Malformed`] - Inconsistent builder input (e.g. enum variants on a class)
/// - [`Error::Empty`] - An empty type or member name was provided
/// - [`Error::DuplicateType`] - A type with the same full name is already registered
///
/// ## Type System Errors
/// - [`Error::TypeInsert`] - Failed to register new type in the registry
/// - [`Error::TypeError`] - General type system operation error
/// - [`Error::TypeMissingParent`] - Base type does not belong to the registry
///
/// # Examples
///
/// ```rust
/// use attrscope::{Error, metadata::assembly::Assembly, metadata::typesystem::TypeBuilder};
///
/// let assembly = Assembly::new("Sample")?;
/// TypeBuilder::new(assembly.registry()).class("Sample", "Widget").build()?;
///
/// match TypeBuilder::new(assembly.registry()).class("Sample", "Widget").build() {
///     Err(Error::DuplicateType(name)) => println!("{} already exists", name),
///     Err(e) => println!("Other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// # Ok::<(), attrscope::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The builder input is inconsistent and could not be turned into metadata.
    ///
    /// The error includes the source location where the problem was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Provided name was empty.
    #[error("Provided name was empty")]
    Empty,

    /// A type with this full name is already registered.
    #[error("Type already registered - {0}")]
    DuplicateType(String),

    /// Failed to insert new type into the `TypeRegistry`.
    ///
    /// The associated [`Token`] identifies which type caused the failure.
    #[error("Failed to insert new type into TypeRegistry - {0}")]
    TypeInsert(Token),

    /// General error during `TypeRegistry` usage.
    ///
    /// Covers type operations that can fail, such as attaching a custom attribute whose
    /// type does not derive from `System.Attribute`.
    #[error("{0}")]
    TypeError(String),

    /// The parent of the current type is missing.
    ///
    /// This error occurs when a type is declared to extend a type that is not registered
    /// in the same registry.
    #[error("The parent of the current type is missing")]
    TypeMissingParent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_error_carries_location() {
        let err = malformed_error!("bad variant {}", "Red");
        match err {
            Error::Malformed {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "bad variant Red");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            _ => panic!("Expected Malformed variant"),
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::TypeInsert(Token::new(0x02000003)).to_string(),
            "Failed to insert new type into TypeRegistry - 0x02000003"
        );
        assert_eq!(
            Error::DuplicateType("A.B".to_string()).to_string(),
            "Type already registered - A.B"
        );
    }
}
