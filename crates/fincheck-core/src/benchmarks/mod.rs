pub mod comparison;
pub mod table;
