mod fix;
mod pack;

pub use fix::{FixCommand, Pass};
pub use pack::PackCommand;
