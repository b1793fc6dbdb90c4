//! Amounts of money and the currencies they are denominated in.

mod amount;
mod commodity;

pub use amount::Money;
pub use commodity::Commodity;
