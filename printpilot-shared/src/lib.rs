pub mod decimal;
pub mod ids;
pub mod pii;

pub use decimal::{format2, parse_decimal, round2};
pub use ids::mint_reference;
pub use pii::Masked;
