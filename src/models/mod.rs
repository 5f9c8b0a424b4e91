pub mod filter;
pub mod flag;
pub mod team;

pub use filter::{FilterOptions, FilterSet};
pub use flag::{Flag, FlagStatus};
pub use team::Team;
