mod quad;
mod vertex;

pub use quad::*;
pub use vertex::*;
