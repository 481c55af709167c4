pub mod trace_rect;
pub mod transform;
pub mod types;

pub use trace_rect::TraceRect;
pub use transform::{IDENTITY_MATRIX, Matrix, Transform, TransformType};
pub use types::{Color, Rect, Size};
