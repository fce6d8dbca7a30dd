pub mod pipeline;
pub mod task_runner;

pub use pipeline::{ImagePipeline, PipelineOutput};
pub use task_runner::{Outcome, TaskKind, TaskRunner, TaskState};
