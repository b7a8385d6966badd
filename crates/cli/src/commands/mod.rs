pub mod generate;
pub mod inspect;
pub mod services;
pub mod util;

pub use generate::*;
pub use inspect::*;
pub use services::*;
pub use util::*;
