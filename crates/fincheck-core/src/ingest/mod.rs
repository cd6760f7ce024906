pub mod columns;
pub mod tabular;
