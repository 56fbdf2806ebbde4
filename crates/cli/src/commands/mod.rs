pub mod containers;
pub mod suggestions;
