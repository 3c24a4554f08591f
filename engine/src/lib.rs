pub mod logging;
pub mod math;

mod macros;
