pub mod diet;
pub mod dilution;
pub mod evaluator;
pub mod pearson;
pub mod reference;
pub mod resolver;

pub use crate::domain::model::{AnimalStandard, DietEntry, Feed, Nutrient, NutrientTotals};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
