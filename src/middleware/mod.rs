pub mod auth;
pub mod response;
pub mod tier_check;

pub use auth::session_middleware;
pub use response::{ApiResponse, ApiResult};
pub use tier_check::{tier_gate_middleware, GateRule, TierCheckResult};
