mod memo;
mod money;
mod period;

pub use memo::*;
pub use money::*;
pub use period::*;
