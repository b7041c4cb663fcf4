//! The metadata model and the custom attribute queries over it.
//!
//! The model follows the ECMA-335 metadata layout: every type, field, method, property,
//! event and attribute instance is a row identified by a [`token::Token`]. It is populated
//! once through [`typesystem::TypeBuilder`] and read-only afterwards.
//!
//! # Key Components
//!
//! - [`assembly`] - Named container enumerating its declared types
//! - [`typesystem`] - Types, the type registry and the builder
//! - [`members`] - Fields, methods, properties, events and member enumeration
//! - [`customattributes`] - Attribute instances, their arguments and kind matching
//! - [`query`] - Attribute accessor, predicates and collectors
//! - [`token`] - Metadata table row references
//!
//! # Thread Safety
//!
//! All model types are `Send + Sync`. A populated registry can be queried from any number
//! of threads without coordination.

pub mod assembly;
pub mod customattributes;
pub mod members;
pub mod query;
pub mod token;
pub mod typesystem;
