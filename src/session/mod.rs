mod selection;
mod store;

pub use selection::*;
pub use store::*;
