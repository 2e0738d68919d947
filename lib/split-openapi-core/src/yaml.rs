//! YAML serialization support using serde-saphyr.
//!
//! Fragments are always written as YAML, whatever format the source document used.
//!
//! # Example
//!
//! ```rust
//! use split_openapi_core::ToYaml;
//!
//! # fn main() -> Result<(), split_openapi_core::YamlError> {
//! let info = serde_json::json!({ "title": "Weather", "version": "v1" });
//! let yaml = info.to_yaml()?;
//!
//! assert_eq!(yaml, "title: Weather\nversion: v1\n");
//! # Ok(())
//! # }
//! ```

use serde::Serialize;

/// Error type for YAML serialization operations.
pub type YamlError = serde_saphyr::ser_error::Error;

/// Extension trait for serializing types to YAML.
///
/// This trait is implemented for all types that implement [`Serialize`].
pub trait ToYaml: Serialize + Sized {
    /// Serializes this value to a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`YamlError`] if serialization fails.
    fn to_yaml(&self) -> Result<String, YamlError> {
        serde_saphyr::to_string(self)
    }
}

impl<T: Serialize + Sized> ToYaml for T {}
