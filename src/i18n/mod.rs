//! Language codes known to the translation provider.

pub mod registry;

pub use registry::{LanguageInfo, LanguageRegistry};
