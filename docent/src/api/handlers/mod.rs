pub mod aggregate;
pub mod answer;
pub mod discourse;
pub(crate) mod health;
pub mod legacy;
pub mod session;

pub use health::health_check;
