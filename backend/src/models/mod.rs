pub mod country;
pub mod granularity;
pub mod macros;
pub mod period;
pub mod record;

pub use country::*;
pub use granularity::*;
pub use period::*;
pub use record::*;
