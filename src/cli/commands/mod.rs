pub mod check;
pub mod quota;
pub mod tier;
pub mod token;
