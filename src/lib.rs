pub mod aggregate;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod table;
pub mod view;
