mod classifier;
mod context;
mod followup;
mod validator;

pub use classifier::{heuristic_keywords, QueryClassifier};
pub use context::{build_context, render_history};
pub use followup::FollowUpGenerator;
pub use validator::{validate, PASSING_SCORE};
