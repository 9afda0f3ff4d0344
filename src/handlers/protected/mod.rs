pub mod access;
pub mod account;
pub mod export;
pub mod limits;
pub mod permissions;

pub use access::chart as access_chart;
pub use access::symbol as access_symbol;
pub use access::timeframe as access_timeframe;

pub use account::admin_policy;
pub use account::affiliate_profile;
pub use account::whoami;

pub use export::entitlements as export_entitlements;

pub use limits::alerts_check;
pub use limits::get as limits_get;
pub use limits::watchlist_check;

pub use permissions::get as permissions_get;
