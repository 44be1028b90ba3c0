//! muster-services — the listing registry and the processes that mutate it.

pub mod ingest;
pub mod registry;
pub mod sweeper;

pub use ingest::{ingest_batch, IngestError, IngestReport};
pub use registry::{Batch, Registry, RegistrySnapshot};
pub use sweeper::{SweepReport, Sweeper, SweeperHandle};
