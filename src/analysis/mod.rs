pub mod edge;
pub mod estimator;
pub mod news;
pub mod pipeline;

pub use edge::classify;
pub use estimator::ProbabilityEstimator;
pub use news::NewsLookup;
pub use pipeline::{rank_opportunities, Analyzer};
