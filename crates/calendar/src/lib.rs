mod boundary;
mod period;

pub use boundary::*;
pub use period::*;
