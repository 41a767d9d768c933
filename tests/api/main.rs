
mod files;

pub use utils::*;
