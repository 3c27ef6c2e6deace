//! Polling seams: what is fetched, how its state is read, and what counts as done.

mod comparator;
mod fetcher;
mod state;

pub use comparator::StateComparator;
pub use fetcher::ResourceFetcher;
pub use state::ResourceState;
