//! Ownership transfer of a patrimony upon death

mod life_insurance;
mod manager;

pub use life_insurance::transfer_life_insurance;
pub use manager::{Heirs, OwnershipManager};
