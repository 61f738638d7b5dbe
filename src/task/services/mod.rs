//! Application services for the task lifecycle.
//!
//! [`Task`] is the runtime entity: it serializes event handling, applies the
//! transition table and runs the side-effect handlers against the ports held
//! by its [`TaskRuntime`].

mod config;
mod handlers;
mod retry;
mod runtime;
mod task;

pub use config::{ConfigError, SubmitRetryConfig, TaskControllerConfig};
pub use retry::SubmitRetryPolicy;
pub use runtime::TaskRuntime;
pub use task::{Task, TaskError, TaskResult};
