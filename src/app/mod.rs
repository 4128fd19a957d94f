pub mod catalog_use_case;
pub mod categories;
pub mod filter;
pub mod installed;
pub mod ports;
pub mod registry;
pub mod representation;
