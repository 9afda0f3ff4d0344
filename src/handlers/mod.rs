// handlers/mod.rs - Route handlers grouped by what they need from the caller
//
// Public (no session) → Protected (session-aware, resolved by
// `middleware::session_middleware`; individual handlers decide whether a
// session is required)

pub mod protected; // /api/access, /api/permissions, /api/limits, /api/auth, ...
pub mod public; // /, /health, /api/tiers
