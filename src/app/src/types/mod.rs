//! Domain-based type organization
//!
//! - ip: Dotted-quad address values and ordering
//! - draft: Editable settings draft with addressing and time source modes
//! - settings: Device wire records (fetched and persisted)

pub mod draft;
pub mod ip;
pub mod settings;

pub use draft::*;
pub use ip::*;
pub use settings::*;
