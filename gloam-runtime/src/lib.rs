pub mod engine;
pub mod error;
pub mod helpers;
pub mod props;

pub use engine::Engine;
pub use error::RenderError;
pub use props::{Constraint, InvalidPropError, PropRule, PropSchema, PropType};
