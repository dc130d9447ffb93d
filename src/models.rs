mod post;
mod report;
mod sentiment;

pub use post::{InputError, PostMeta, RawPost};
pub use report::{AggregateReport, LabelCounts};
pub use sentiment::{
    InvalidResultError, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, SentimentLabel, SentimentResult,
};
