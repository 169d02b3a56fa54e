//! # gensource
//!
//! A synthetic, partitioned data source for distributed batch pipelines.
//!
//! Given a pure generator function mapping an index in `[0, n)` to a value,
//! and the count `n`, this crate produces a virtual collection of `n` values
//! without ever materializing them on a single node. The index space is
//! partitioned into contiguous ranges sized for the available parallelism,
//! the serialized function is distributed to every worker exactly once per
//! source instance, and each worker lazily evaluates only the slice it owns.
//!
//! ## Architecture
//!
//! - **[`GenSource`]**: submission-time façade that publishes the count and
//!   the function to job-scoped configuration and the distribution store
//! - **[`partition_range`]**: splits `[0, n)` into contiguous, non-overlapping
//!   partitions from a parallelism hint
//! - **[`SplitDescriptor`]**: the serializable unit of work shipped to one
//!   worker, bundling a partition with the shared generator function
//! - **[`RangeReader`]**: worker-side pull iterator that evaluates the
//!   function lazily over its assigned range, with progress reporting
//! - **[`DistributionStore`]**: key-value blob store boundary used to publish
//!   the function once and retrieve it on every worker
//!
//! ## Example
//!
//! ```rust
//! use gensource::{
//!     FunctionRegistry, FunctionSpec, GenSource, InMemoryStore, JobConfig, PlanningContext,
//!     RangeReader,
//! };
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), gensource::GenSourceError> {
//! let mut ctx = PlanningContext::new(JobConfig::new(), Arc::new(InMemoryStore::new()));
//!
//! // Submission: publish a virtual collection of 10 squares.
//! let source = GenSource::publish(10, FunctionSpec::new("square"), &mut ctx).await?;
//! assert_eq!(source.input_size(), 10);
//!
//! // Planning: one split per partition.
//! let splits = GenSource::create_splits(&ctx).await?;
//!
//! // Execution: each worker drives a reader over its split.
//! let registry = FunctionRegistry::with_builtins();
//! for split in &splits {
//!     let mut reader = RangeReader::open(split, &registry)?;
//!     while reader.advance()? {
//!         let _value = reader.current()?;
//!     }
//!     assert_eq!(reader.progress(), 1.0);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod distribution;
pub mod error;
pub mod function;
pub mod instance;
pub mod partition;
pub mod reader;
pub mod source;
pub mod split;
pub mod traits;

pub use config::JobConfig;
pub use distribution::{function_key, DistributionStore, InMemoryStore};
pub use error::GenSourceError;
pub use function::{FunctionRegistry, FunctionSpec, GenFn, Value};
pub use instance::InstanceIdAllocator;
pub use partition::{partition_range, Partition};
pub use reader::RangeReader;
pub use source::{GenSource, PlanningContext};
pub use split::SplitDescriptor;
pub use traits::PartitionedSource;
