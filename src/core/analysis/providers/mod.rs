//! Analysis Provider Implementations

mod fixture;
#[cfg(feature = "remote-analysis")]
mod remote;

pub use fixture::FixtureAnalysisProvider;
#[cfg(feature = "remote-analysis")]
pub use remote::HttpAnalysisProvider;
