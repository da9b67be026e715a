//! Messages understood by a registry task.

use graft_engine::Provider;
use tokio::sync::oneshot;

/// Requests sent to a registry task, answered over the attached channel.
#[derive(Debug)]
pub enum Command {
    /// Union the providers into the registered set.
    Register {
        providers: Vec<Provider>,
        /// Number of types that were not registered before
        reply: oneshot::Sender<usize>,
    },

    /// Read the registered set.
    Get { reply: oneshot::Sender<Vec<Provider>> },

    /// Stop the task once queued commands are handled.
    Stop,
}
