//! Page lifecycle: mount applies document metadata and schedules the end of
//! the loading phase; unmount releases the pending timer.

use crate::{
    config::PortfolioConfig,
    document::{apply_page_metadata, DocumentEnvironment},
    output::render_page,
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::{Rc, Weak},
    time::Duration,
};
use yew::Html;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoadingState {
    is_loading: bool,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: true }
    }
}

impl LoadingState {
    pub fn is_loading(self) -> bool {
        self.is_loading
    }

    /// Returns whether this call performed the transition.
    pub fn finish(&mut self) -> bool {
        std::mem::replace(&mut self.is_loading, false)
    }
}

/// Dropping this cancels the task if it hasn't run yet.
#[must_use = "dropping a ScheduledTask cancels it"]
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ScheduledTask {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> ScheduledTask;
}

/// Single-threaded virtual clock. Time only moves on `advance`.
#[derive(Clone, Default)]
pub struct ManualClock {
    inner: Rc<RefCell<ClockInner>>,
}

#[derive(Default)]
struct ClockInner {
    now: Duration,
    next_id: u64,
    /// Keyed by deadline, then insertion order.
    pending: BTreeMap<(Duration, u64), Box<dyn FnOnce()>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl ManualClock {
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Runs every task due within `by`, in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let task = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .pending
                    .first_key_value()
                    .is_some_and(|(&(deadline, _), _)| deadline <= target);
                if due {
                    inner.pending.pop_first().map(|((deadline, _), task)| {
                        inner.now = deadline;
                        task
                    })
                } else {
                    None
                }
            };
            match task {
                // Borrow released, so the task may schedule or cancel.
                Some(task) => task(),
                None => break,
            }
        }
        self.inner.borrow_mut().now = target;
    }
}

impl Scheduler for ManualClock {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> ScheduledTask {
        let key = {
            let mut inner = self.inner.borrow_mut();
            let key = (inner.now + delay, inner.next_id);
            inner.next_id += 1;
            inner.pending.insert(key, task);
            key
        };
        let clock: Weak<RefCell<ClockInner>> = Rc::downgrade(&self.inner);
        ScheduledTask::new(move || {
            if let Some(clock) = clock.upgrade() {
                let removed = clock.borrow_mut().pending.remove(&key);
                drop(removed);
            }
        })
    }
}

#[derive(Default)]
struct PageState {
    loading: Cell<LoadingState>,
    /// State changes that would trigger a re-render.
    updates: Cell<usize>,
}

/// One instance of the portfolio page bound to a host document.
pub struct PortfolioPage<'a> {
    config: &'a PortfolioConfig,
    state: Rc<PageState>,
    timer: Option<ScheduledTask>,
    mounted: bool,
}

impl<'a> PortfolioPage<'a> {
    pub fn new(config: &'a PortfolioConfig) -> Self {
        Self {
            config,
            state: Rc::default(),
            timer: None,
            mounted: false,
        }
    }

    /// Bootstrap. A second call while mounted does nothing.
    pub fn mount<D, S>(&mut self, doc: &mut D, scheduler: &S)
    where
        D: DocumentEnvironment + ?Sized,
        S: Scheduler + ?Sized,
    {
        if self.mounted {
            tracing::debug!("page already mounted");
            return;
        }
        self.mounted = true;
        self.state = Rc::default();

        apply_page_metadata(doc, &self.config.metadata());

        let state = Rc::downgrade(&self.state);
        let delay = self.config.loading_delay();
        self.timer = Some(scheduler.schedule(
            delay,
            Box::new(move || {
                // Gone if the page was torn down in the meantime.
                let Some(state) = state.upgrade() else {
                    return;
                };
                let mut loading = state.loading.get();
                if loading.finish() {
                    state.loading.set(loading);
                    state.updates.set(state.updates.get() + 1);
                    tracing::debug!("loading overlay dismissed");
                }
            }),
        ));
        tracing::debug!(?delay, "page mounted");
    }

    pub fn unmount(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        if std::mem::replace(&mut self.mounted, false) {
            tracing::debug!("page unmounted");
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading.get().is_loading()
    }

    pub fn render(&self, year: i32) -> Html {
        render_page(self.config, self.is_loading(), year)
    }
}

#[cfg(test)]
impl PortfolioPage<'_> {
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn updates(&self) -> usize {
        self.state.updates.get()
    }
}

impl Drop for PortfolioPage<'_> {
    fn drop(&mut self) {
        self.unmount();
    }
}
