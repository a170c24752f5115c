mod answer;
mod botcheck;
mod discourse;
mod ratelimit;
mod response_cache;
mod session;

pub use answer::{
    AnswerEnhancement, AnswerRequest, AnswerService, GeneratedAnswer, KeywordExtraction,
    DEFAULT_MAX_KEYWORDS,
};
pub use botcheck::BotScoreVerifier;
pub use discourse::{DiscourseResponder, ForumPost, ForumReply, MetricsSnapshot};
pub use ratelimit::{RateDecision, RateLimiter};
pub use response_cache::ResponseCache;
pub use session::{SessionStore, SessionSweeper};
