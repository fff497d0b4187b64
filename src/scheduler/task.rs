use std::mem;
use std::sync::Mutex;

use futures::channel::oneshot;

/// One schedulable compaction invocation. The parallelism across workers
/// lives inside the invocation, behind its bulk-synchronous phases, so a
/// task is a single unit of work as far as the submitter is concerned.
pub trait Task: Sync + Send {
    fn execute(&self);
}

/// Hands an invocation's result back to the submitter. Any worker holding a
/// shared reference may deliver; only the first delivery is kept.
pub struct ResultSender<T> {
    inner: Mutex<Option<oneshot::Sender<T>>>,
}

impl<T> ResultSender<T> {
    pub fn new(sender: oneshot::Sender<T>) -> ResultSender<T> {
        ResultSender {
            inner: Mutex::new(Some(sender)),
        }
    }

    pub fn deliver(&self, value: T) {
        let mut sender_opt = self.inner.lock().unwrap();
        if let Some(sender) = mem::take(&mut *sender_opt) {
            let _ = sender.send(value);
        }
    }
}

struct FnTask<F, T>
where
    F: Fn() -> T + Sync + Send + 'static,
    T: Send,
{
    fun: F,
    sender: ResultSender<T>,
}

impl<F, T> Task for FnTask<F, T>
where
    F: Fn() -> T + Sync + Send + 'static,
    T: Send,
{
    fn execute(&self) {
        self.sender.deliver((self.fun)());
    }
}

impl dyn Task {
    pub fn from_fn<F, T>(fun: F) -> (impl Task, oneshot::Receiver<T>)
    where
        F: Fn() -> T + Sync + Send + 'static,
        T: Send,
    {
        let (sender, receiver) = oneshot::channel();
        (
            FnTask {
                fun,
                sender: ResultSender::new(sender),
            },
            receiver,
        )
    }
}
