//! Height and timestamp bounds after which a packet or an upgrade attempt is
//! no longer processed.

mod height;
mod timestamp;

pub use height::*;
pub use timestamp::*;
