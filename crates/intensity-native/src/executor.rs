use intensity_core::{LocalTask, Spawn};
use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Wake, Waker};

struct NoopWake;

impl Wake for NoopWake {
    fn wake(self: Arc<Self>) {}
}

/// Frame-driven executor: every pending task is polled once per
/// [`FrameExecutor::poll_all`], which the event loop calls each iteration.
#[derive(Default)]
pub struct FrameExecutor {
    queue: RefCell<Vec<LocalTask>>,
}

impl FrameExecutor {
    /// Poll everything once. Returns how many tasks completed.
    pub fn poll_all(&self) -> usize {
        let mut tasks = std::mem::take(&mut *self.queue.borrow_mut());
        if tasks.is_empty() {
            return 0;
        }
        let waker = Waker::from(Arc::new(NoopWake));
        let mut cx = Context::from_waker(&waker);
        let before = tasks.len();
        tasks.retain_mut(|t| t.as_mut().poll(&mut cx).is_pending());
        let done = before - tasks.len();
        // tasks spawned while polling landed in the queue; keep them after the survivors
        let mut queue = self.queue.borrow_mut();
        tasks.append(&mut *queue);
        *queue = tasks;
        done
    }
}

impl Spawn for FrameExecutor {
    fn spawn(&self, task: LocalTask) {
        self.queue.borrow_mut().push(task);
    }
}
