pub mod system;
pub mod tiers;

pub use system::{health, not_found, root};
pub use tiers::get as tiers_get;
pub use tiers::list as tiers_list;
