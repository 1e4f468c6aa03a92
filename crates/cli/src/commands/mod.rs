pub mod config;
pub mod explain;
pub mod latest;
pub mod readiness;
pub mod util;

pub use config::*;
pub use explain::*;
pub use latest::*;
pub use readiness::*;
pub use util::*;
