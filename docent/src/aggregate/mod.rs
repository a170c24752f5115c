mod aggregator;
mod sources;

pub use aggregator::{
    AggregatedAnswer, AggregationMetrics, AggregationOverrides, MultiSourceAggregator,
};
pub use sources::{GithubIssueSearch, JsonFeedSearch, SourceSearch};
