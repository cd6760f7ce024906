pub mod analysis;
pub mod bands;
pub mod creditworthiness;
pub mod metrics;
