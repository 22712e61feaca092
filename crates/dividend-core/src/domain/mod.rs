//! 도메인 모델.

mod company;
mod dividend;

pub use company::Company;
pub use dividend::{CompanyDividends, Dividend};
