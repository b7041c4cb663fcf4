// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # attrscope
//!
//! Custom attribute queries over an ECMA-335 shaped metadata model.
//!
//! `attrscope` answers the questions code generators, validators and plugin loaders ask
//! about annotated code: which attributes are attached to this type, member or enum value,
//! does it carry all of these attributes, which types of an assembly are exported, which
//! members of a type are marked required. The metadata model the queries run on is
//! declared through a fluent builder and is immutable afterwards.
//!
//! ## Architecture
//!
//! - **Model** ([`metadata::typesystem`], [`metadata::members`], [`metadata::customattributes`]):
//!   types with their members and attached attribute instances, owned by a
//!   [`metadata::typesystem::TypeRegistry`]
//! - **Accessor** ([`metadata::query::HasCustomAttributes`]): the attributes of one element,
//!   optionally filtered by attribute class
//! - **Predicates** ([`metadata::query::AttributePredicates`]): presence checks
//! - **Collectors**: types of an [`metadata::assembly::Assembly`] and members of a type,
//!   selected by their attributes
//!
//! Attribute classes match along the class hierarchy: asking for `ConstraintAttribute`
//! finds a `RangeAttribute` deriving from it, but not the other way round.
//!
//! ## Quick Start
//!
//! ```rust
//! use attrscope::prelude::*;
//!
//! let assembly = Assembly::new("Plugins")?;
//! let exported = TypeBuilder::new(assembly.registry())
//!     .attribute_class("Plugins", "ExportedAttribute")
//!     .build()?;
//!
//! TypeBuilder::new(assembly.registry())
//!     .class("Plugins", "A")
//!     .attribute(&exported)
//!     .build()?;
//! TypeBuilder::new(assembly.registry())
//!     .class("Plugins", "B")
//!     .build()?;
//!
//! let names: Vec<String> = assembly
//!     .types_with_attribute(&exported)
//!     .map(|t| t.fullname())
//!     .collect();
//! assert_eq!(names, vec!["Plugins.A"]);
//! # Ok::<(), attrscope::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (registry inserts and token allocation at `trace`,
//! rejected declarations and unresolved enum values at `debug`, exhausted token rows at
//! `warn`) and installs no subscriber.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use attrscope::prelude::*;
///
/// let assembly = Assembly::new("Sample")?;
/// let marker = TypeBuilder::new(assembly.registry())
///     .attribute_class("Sample", "MarkerAttribute")
///     .build()?;
/// assert!(!marker.has_any_custom_attribute(&[]));
/// # Ok::<(), attrscope::Error>(())
/// ```
pub mod prelude;

/// The metadata model and the attribute queries
pub mod metadata;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used for every fallible model construction; queries never fail.
pub type Result<T> = std::result::Result<T, Error>;

/// `attrscope` Error type
///
/// # Examples
///
/// ```rust
/// use attrscope::{metadata::typesystem::TypeRegistry, Error};
///
/// match TypeRegistry::new("") {
///     Err(Error::Empty) => println!("an assembly needs a name"),
///     Err(e) => println!("Error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
pub use error::Error;
