pub mod runner;
pub mod tools;

pub use runner::{ExecutionResult, Executor, ProcessExecutor, ProcessRun, RunningTool, ToolInvocation};
