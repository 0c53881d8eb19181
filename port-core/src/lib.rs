//! Port Core
//!
//! Core library for a catalog provider that translates declarative configuration
//! into catalog API request bodies and API responses back into configuration state.
//!
//! ## Module Structure
//!
//! - `value` - Closed decoding of untyped JSON values
//! - `schema` - Blueprint schema (declared property and item types)
//! - `blueprint` - Blueprint configuration model and its mapper
//! - `entity` - Entity wire record, configuration model and its mapper
//! - `scorecard` - Scorecard wire record, configuration model and its mapper
//! - `resource` - Resource identity and state as seen by a provider host
//! - `provider` - Provider trait abstracting resource operations

pub mod blueprint;
pub mod entity;
pub mod error;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod scorecard;
pub mod value;

pub use error::{MappingError, MappingResult};
