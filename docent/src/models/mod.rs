mod analysis;
mod common;
mod document;
mod session;
mod validation;

pub use analysis::*;
pub use common::*;
pub use document::*;
pub use session::*;
pub use validation::*;
