mod date;
mod error;
pub mod mealplan;
pub mod recipe;
mod remote;
pub mod shopping;
mod store;

pub use date::*;
pub use error::*;
pub use remote::*;
pub use store::*;
