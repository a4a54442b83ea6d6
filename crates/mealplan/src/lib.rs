mod assignment;
mod planner;
mod template;

pub use assignment::*;
pub use planner::*;
pub use template::*;
