pub mod artifacts;
pub mod executor;
pub mod scheduler;


pub use artifacts::ArtifactStore;
pub use executor::{ExecutorOptions, GraphExecutor, PipelineResult};
pub use scheduler::topological_sort;
