//! The generator source façade
//!
//! Submission time: [`GenSource::publish`] allocates a fresh instance id,
//! writes the count and the id into job-scoped configuration, and pushes
//! the serialized function to the distribution store.
//!
//! Planning time: [`GenSource::create_splits`] reads the count and id back
//! from configuration, pulls the function from the store, partitions the
//! index space from the ambient parallelism hint, and builds one split
//! descriptor per partition. The function spec is parsed once and shared
//! across all descriptors of the call.
//!
//! Execution time: each worker decodes its descriptor and drives a
//! [`RangeReader`] over it via [`GenSource::open_reader`].

use crate::config::{JobConfig, COUNT_KEY, INSTANCE_ID_KEY};
use crate::distribution::{function_key, DistributionStore};
use crate::error::GenSourceError;
use crate::function::{FunctionRegistry, FunctionSpec};
use crate::instance::InstanceIdAllocator;
use crate::partition::partition_range;
use crate::reader::RangeReader;
use crate::split::SplitDescriptor;
use crate::traits::PartitionedSource;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

/// Everything the submission and planning sides share: the job
/// configuration, the distribution store handle, and the instance id
/// allocator. Created once per planning context and threaded through every
/// façade call in that context.
pub struct PlanningContext {
    config: JobConfig,
    store: Arc<dyn DistributionStore>,
    instance_ids: InstanceIdAllocator,
}

impl PlanningContext {
    pub fn new(config: JobConfig, store: Arc<dyn DistributionStore>) -> Self {
        Self {
            config,
            store,
            instance_ids: InstanceIdAllocator::new(),
        }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut JobConfig {
        &mut self.config
    }

    pub fn store(&self) -> &dyn DistributionStore {
        self.store.as_ref()
    }
}

/// One logical function-based source: a count and a generator function,
/// published once and consumed by many workers.
pub struct GenSource {
    instance_id: u64,
    count: u64,
    spec: Arc<FunctionSpec>,
}

impl GenSource {
    /// Publish a source of `count` values generated by `spec`.
    ///
    /// Allocates a fresh instance id, records `(id, count)` in the job
    /// configuration, and pushes the serialized spec to the store under
    /// the id-derived key. The id is assigned exactly once, before the
    /// configuration is published.
    pub async fn publish(
        count: u64,
        spec: FunctionSpec,
        ctx: &mut PlanningContext,
    ) -> Result<Self, GenSourceError> {
        let instance_id = ctx.instance_ids.next();
        ctx.config.set_u64(COUNT_KEY, count);
        ctx.config.set_u64(INSTANCE_ID_KEY, instance_id);
        ctx.store
            .put(&function_key(instance_id), spec.to_bytes()?)
            .await?;
        info!(
            "published generator source {} with {} values (function '{}')",
            instance_id, count, spec.name
        );
        Ok(Self {
            instance_id,
            count,
            spec: Arc::new(spec),
        })
    }

    /// Plan one split per partition, from configuration and the store
    /// alone. Runs on the planning side, which may not hold the
    /// [`GenSource`] value that published the job.
    pub async fn create_splits(
        ctx: &PlanningContext,
    ) -> Result<Vec<SplitDescriptor>, GenSourceError> {
        let count = ctx.config.require_u64(COUNT_KEY)?;
        let instance_id = ctx.config.require_u64(INSTANCE_ID_KEY)?;
        let hint = ctx.config.parallelism_hint()?;

        let payload = ctx.store.get(&function_key(instance_id)).await?;
        let spec = Arc::new(FunctionSpec::from_bytes(&payload)?);

        let partitions = partition_range(count, hint);
        debug!(
            "planned {} splits for source {} ({} values, hint {})",
            partitions.len(),
            instance_id,
            count,
            hint
        );
        Ok(partitions
            .into_iter()
            .map(|partition| SplitDescriptor::new(partition, Arc::clone(&spec)))
            .collect())
    }

    /// Open a reader over one split on a worker.
    pub fn open_reader(
        descriptor: &SplitDescriptor,
        registry: &FunctionRegistry,
    ) -> Result<RangeReader, GenSourceError> {
        RangeReader::open(descriptor, registry)
    }

    /// The instance id assigned at publication.
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    /// Exact size estimate: the count is known upfront.
    pub fn input_size(&self) -> u64 {
        self.count
    }

    /// The function spec this source was published with.
    pub fn spec(&self) -> &FunctionSpec {
        &self.spec
    }

    /// Pre-submission validation. There is no precondition to verify.
    pub fn check(&self) -> Result<(), GenSourceError> {
        Ok(())
    }
}

#[async_trait]
impl PartitionedSource for GenSource {
    async fn create_splits(
        &self,
        ctx: &PlanningContext,
    ) -> Result<Vec<SplitDescriptor>, GenSourceError> {
        GenSource::create_splits(ctx).await
    }

    fn open_reader(
        &self,
        descriptor: &SplitDescriptor,
        registry: &FunctionRegistry,
    ) -> Result<RangeReader, GenSourceError> {
        GenSource::open_reader(descriptor, registry)
    }

    fn input_size(&self) -> u64 {
        self.count
    }

    fn check(&self) -> Result<(), GenSourceError> {
        GenSource::check(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PARALLELISM_KEY;
    use crate::distribution::InMemoryStore;

    fn context() -> PlanningContext {
        PlanningContext::new(JobConfig::new(), Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn test_publish_writes_config_and_store() {
        let mut ctx = context();
        let source = GenSource::publish(100, FunctionSpec::new("identity"), &mut ctx)
            .await
            .unwrap();

        assert_eq!(source.input_size(), 100);
        assert_eq!(source.spec().name, "identity");
        assert!(source.check().is_ok());
        assert_eq!(ctx.config().require_u64(COUNT_KEY).unwrap(), 100);
        assert_eq!(
            ctx.config().require_u64(INSTANCE_ID_KEY).unwrap(),
            source.instance_id()
        );
        assert!(ctx
            .store()
            .get(&function_key(source.instance_id()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_instance_ids_do_not_collide() {
        let mut ctx = context();
        let first = GenSource::publish(1, FunctionSpec::new("identity"), &mut ctx)
            .await
            .unwrap();
        let second = GenSource::publish(2, FunctionSpec::new("square"), &mut ctx)
            .await
            .unwrap();
        assert_ne!(first.instance_id(), second.instance_id());

        // Both functions remain retrievable under their own keys.
        assert!(ctx.store().get(&function_key(first.instance_id())).await.is_ok());
        assert!(ctx.store().get(&function_key(second.instance_id())).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_splits_shares_the_spec() {
        let mut ctx = context();
        ctx.config_mut().set_u64(PARALLELISM_KEY, 3);
        GenSource::publish(10, FunctionSpec::new("square"), &mut ctx)
            .await
            .unwrap();

        let splits = GenSource::create_splits(&ctx).await.unwrap();
        assert_eq!(splits.len(), 3);
        assert_eq!(
            splits.iter().map(|s| (s.start(), s.length())).collect::<Vec<_>>(),
            vec![(0, 3), (3, 3), (6, 4)]
        );
        for split in &splits {
            assert_eq!(split.function().name, "square");
        }
    }

    #[tokio::test]
    async fn test_create_splits_without_publish_fails() {
        let ctx = context();
        assert!(matches!(
            GenSource::create_splits(&ctx).await,
            Err(GenSourceError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_function_key_is_fatal() {
        // Configuration points at an instance whose function was never
        // pushed: a submission/planning bug surfaced as KeyNotFound.
        let mut ctx = context();
        ctx.config_mut().set_u64(COUNT_KEY, 5);
        ctx.config_mut().set_u64(INSTANCE_ID_KEY, 41);
        assert!(matches!(
            GenSource::create_splits(&ctx).await,
            Err(GenSourceError::KeyNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_count_plans_zero_splits() {
        let mut ctx = context();
        GenSource::publish(0, FunctionSpec::new("identity"), &mut ctx)
            .await
            .unwrap();
        assert!(GenSource::create_splits(&ctx).await.unwrap().is_empty());
    }
}
