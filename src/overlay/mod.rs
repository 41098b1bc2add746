pub mod driver;
pub mod resolver;

pub use driver::{Convergence, Driver, Merge, Step};
pub use resolver::{Replacement, Resolution, Resolver};
