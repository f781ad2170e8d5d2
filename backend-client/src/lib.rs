//! HTTP client for the gitss search API (`/api/v1/...`).

mod client;
mod error;

pub use client::ClientOptions;
pub use client::DEFAULT_BASE_URL;
pub use client::DEFAULT_TIMEOUT;
pub use client::SearchBackend;
pub use client::SearchClient;
pub use error::ClientError;
pub use error::Result;
