mod error;
mod extract;
mod fetcher;
mod resolver;
mod save;
mod session;
mod types;
mod validate;

#[cfg(test)]
mod test_support;

pub use error::{BoxError, ErrorKind, ResolveError};
pub use extract::{extract_media_url, Strategy, MAX_SEARCH_DEPTH, STRATEGIES};
pub use fetcher::{Fetcher, HttpFetcher};
pub use resolver::{Resolver, ResolverConfig, DEFAULT_QUERY_PARAM, DEFAULT_TIMEOUT};
pub use save::{save_media, SavedMedia};
pub use session::{Session, Submission};
pub use types::{Extraction, Phase, Rejection, Reply, Verdict};
pub use validate::{admit, validate};
