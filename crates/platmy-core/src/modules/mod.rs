pub mod abundances;
pub mod chemistry;
pub mod housekeeping;
pub mod serialization;
pub mod spectrum;
pub mod sweep;

mod traits;

pub use traits::{EquilibriumChemistry, SpectrumEngine, SpectrumPlotter};
