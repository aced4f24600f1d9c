pub mod generation;
pub mod view;

pub use generation::*;
pub use view::*;
