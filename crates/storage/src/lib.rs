mod memory;

pub use memory::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "sqlite")] {
        mod sqlite;

        pub use sqlite::*;
    }
}
