pub mod engines;
pub mod metadata;
pub mod orchestrator;
pub mod trailer;
pub mod voice;

pub use orchestrator::AnalysisOrchestrator;
