use rayon::prelude::*;
use tracing::info;

use crate::{
    config::{BatchConfig, CompilerConfig},
    error::{FxGraphError, Result},
    graph::{assembler::Compilation, compiler::GraphCompiler},
    timeline::EffectItem,
};

/// One timeline to compile
#[derive(Debug, Clone)]
pub struct TimelineJob {
    pub items: Vec<EffectItem>,
    pub total_duration: f64,
}

impl TimelineJob {
    pub fn new(items: Vec<EffectItem>, total_duration: f64) -> Self {
        Self { items, total_duration }
    }
}

/// Compiles independent timelines in parallel on a dedicated pool
pub struct BatchCompiler {
    compiler: GraphCompiler,
    pool: rayon::ThreadPool,
}

impl BatchCompiler {
    pub fn new(compiler: GraphCompiler, batch: &BatchConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(batch.threads)
            .thread_name(|i| format!("fxgraph-batch-{}", i))
            .build()
            .map_err(|e| FxGraphError::generic(format!("Failed to build batch pool: {}", e)))?;

        info!("Batch compiler ready with {} thread(s)", pool.current_num_threads());
        Ok(Self { compiler, pool })
    }

    pub fn from_config(compiler: CompilerConfig, batch: &BatchConfig) -> Result<Self> {
        Self::new(GraphCompiler::new(compiler), batch)
    }

    /// Compile every job; results come back in job order
    ///
    /// A failing job does not stop the others.
    pub fn compile_all(&self, jobs: &[TimelineJob]) -> Vec<Result<Compilation>> {
        self.pool.install(|| {
            jobs.par_iter()
                .map(|job| self.compiler.compile(&job.items, job.total_duration))
                .collect()
        })
    }
}
