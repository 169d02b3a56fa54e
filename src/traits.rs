//! Capability traits for batch-host integration
//!
//! The surrounding planner only needs a generic partitioned-source
//! capability: plan the splits, open a reader over one of them, report the
//! input size. Any batch-execution host can drive an implementation of
//! this trait; [`GenSource`](crate::GenSource) is the one this crate ships.

use crate::error::GenSourceError;
use crate::function::FunctionRegistry;
use crate::reader::RangeReader;
use crate::source::PlanningContext;
use crate::split::SplitDescriptor;
use async_trait::async_trait;

#[async_trait]
pub trait PartitionedSource: Send + Sync {
    /// Plan one split per partition of the source's index space. Runs on
    /// the planning side; crosses the distribution-store boundary.
    async fn create_splits(
        &self,
        ctx: &PlanningContext,
    ) -> Result<Vec<SplitDescriptor>, GenSourceError>;

    /// Open a reader over one split. Runs on a worker; purely local.
    fn open_reader(
        &self,
        descriptor: &SplitDescriptor,
        registry: &FunctionRegistry,
    ) -> Result<RangeReader, GenSourceError>;

    /// Size estimate for the planner. Exact for generator sources, since
    /// the count is known upfront.
    fn input_size(&self) -> u64;

    /// Validate preconditions before submission.
    fn check(&self) -> Result<(), GenSourceError>;
}
