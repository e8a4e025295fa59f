use intensity_core::{LocalTask, Spawn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

type SettleHook = Rc<RefCell<Option<Box<dyn Fn()>>>>;

/// Runs detached tasks on the browser microtask queue and calls a hook after
/// each one completes so the UI can pick up the new hardware view.
#[derive(Default)]
pub struct WebSpawner {
    on_settle: SettleHook,
}

impl WebSpawner {
    /// Install the hook. Set after the adapter exists since the hook usually
    /// needs the surface the adapter lives in.
    pub fn set_on_settle(&self, hook: impl Fn() + 'static) {
        *self.on_settle.borrow_mut() = Some(Box::new(hook));
    }
}

impl Spawn for WebSpawner {
    fn spawn(&self, task: LocalTask) {
        let hook = self.on_settle.clone();
        spawn_local(async move {
            task.await;
            if let Some(f) = hook.borrow().as_ref() {
                f();
            }
        });
    }
}
