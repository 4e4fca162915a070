pub mod property;

pub use property::{PermitType, Property, RiskLevel};
