mod matches;
mod table;

pub use matches::*;
pub use table::*;
