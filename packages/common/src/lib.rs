pub mod engine;
pub mod line_index;
pub mod marker;
pub mod span;
pub mod suggest;

pub use engine::*;
pub use line_index::*;
pub use marker::*;
pub use span::*;
pub use suggest::*;
