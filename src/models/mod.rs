mod license;
mod order;

pub use license::*;
pub use order::*;
