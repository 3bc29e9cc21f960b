//! Load generation: the bounded job queue, the dispatcher feeding it, the
//! worker pool draining it, and the controller that wires them to the
//! aggregator and owns shutdown ordering.
mod dispatcher;
mod queue;
mod runner;
mod worker;


pub use dispatcher::setup_dispatcher;
pub use queue::{JobReceiver, JobSender, JobToken, job_queue};
pub use runner::{LoadRunner, RunReport};
pub use worker::Worker;
