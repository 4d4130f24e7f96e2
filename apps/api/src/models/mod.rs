pub mod headline;
pub mod suitability;
pub mod swot;
