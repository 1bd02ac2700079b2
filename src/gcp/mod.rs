//! Google Cloud access through the `gcloud` CLI.

pub mod gcloud;
pub mod storage;

pub use gcloud::Gcloud;
