pub mod fallback;
pub mod reference;

pub use fallback::FallbackSource;
pub use reference::{ReferenceDataSource, SourceError};
