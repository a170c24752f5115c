//! Wire types for the REST API.
//!
//! These define the request and response formats and convert to the domain
//! models in `src/models/`; nothing here leaks into the services.

pub mod aggregate;
pub mod answer;
pub mod discourse;
pub mod legacy;
pub mod session;

pub use aggregate::*;
pub use answer::*;
pub use discourse::*;
pub use legacy::*;
pub use session::*;
