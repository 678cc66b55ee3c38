pub mod conversion;
pub mod definition;
pub mod editor;
mod index;

pub use conversion::*;
pub use definition::*;
pub use editor::*;
pub use index::DependencyIndex;
