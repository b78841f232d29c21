//! Ctrl-C forwarding.

use std::future::Future;
use std::io;
use tokio::sync::mpsc;

/// Receiving end of [`forward_interrupts`].
pub type Interrupts = mpsc::UnboundedReceiver<()>;

/// Forward every Ctrl-C to one channel for the life of the process.
///
/// Once tokio listens for SIGINT the default handler stays replaced, so the
/// prompt and auto-play must share this one listener.
pub fn listen_for_ctrl_c() -> Interrupts {
    forward_interrupts(tokio::signal::ctrl_c)
}

/// Spawn a task that sends `()` each time `next` resolves with `Ok`.
///
/// The channel closes when `next` fails or the receiver is dropped.
pub fn forward_interrupts<F, Fut>(mut next: F) -> Interrupts
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = io::Result<()>> + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while next().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}
