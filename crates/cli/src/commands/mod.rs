mod lookup;
mod serve;

pub use lookup::lookup;
pub use serve::serve;
