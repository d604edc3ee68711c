pub mod command;
pub mod dispatcher;

pub use command::{CommandSpec, Invocation};
pub use dispatcher::{DispatchOutcome, Dispatcher, EngineDispatcher};
