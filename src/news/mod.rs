mod client;
#[cfg(test)]
pub(crate) mod stub;
mod sync;

pub use client::NewsApiClient;
pub use sync::{ArticleSyncService, SweepReport};
