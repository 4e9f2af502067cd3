pub mod bouquet;

pub use bouquet::{Budget, BouquetSpec, GenerationRequest, GenerationResult, BUDGET_FLOOR};
