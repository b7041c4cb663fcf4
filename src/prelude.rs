//! # attrscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the attrscope library. Import this module to get the model, the builder and all
//! query traits in scope at once.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all attrscope operations
pub use crate::Error;

/// The result type used throughout attrscope
pub use crate::Result;

// ================================================================================================
// Model
// ================================================================================================

/// Assemblies and metadata tokens
pub use crate::metadata::{assembly::Assembly, token::Token};

/// Core type system components
pub use crate::metadata::typesystem::{
    CilFlavor, CilType, CilTypeRc, CilTypeRef, TypeAttributes, TypeBuilder, TypeRegistry,
    TypeSource,
};

/// Members and member enumeration
pub use crate::metadata::members::{
    BindingFlags, EnumValue, Event, Field, Member, MemberAccess, MemberKinds, MemberType,
    MetadataEnum, Method, Property,
};

/// Custom attribute instances
pub use crate::metadata::customattributes::{
    AttributeType, CustomAttribute, CustomAttributeArgument, CustomAttributeRc,
    CustomAttributeValue,
};

// ================================================================================================
// Queries
// ================================================================================================

/// Attribute accessor, predicates, type queries and collector results
pub use crate::metadata::query::{
    AttributePredicates, HasCustomAttributes, MemberAttributeMap, TypeQuery,
};
