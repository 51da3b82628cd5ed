//! Pagination over in-memory sequences.
//!
//! Two navigation policies exist: clamped (galleries, archive, recommendations)
//! and wraparound (the certifications carousel). The carousel also advances
//! on a timer, which is suspended while the pointer hovers it.

use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// `ceil(len / page_size)`; zero for an empty sequence
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}

/// One page of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub index: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.index > 0
    }
}

/// Slice out page `index`. An index past the end is clamped to the last page.
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize, index: usize) -> Page<'_, T> {
    let total = total_pages(items.len(), page_size);
    if total == 0 {
        return Page { items: &items[..0], index: 0, page_size: page_size.get(), total_pages: 0 };
    }

    let index = index.min(total - 1);
    let start = index * page_size.get();
    let end = (start + page_size.get()).min(items.len());

    Page { items: &items[start..end], index, page_size: page_size.get(), total_pages: total }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavPolicy {
    /// Stop at either end
    Clamped,
    /// Cycle past either end
    Wraparound,
}

/// Direction of the last navigation, used to pick the slide animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    Forward,
    Backward,
}

/// Current page index over a sequence of `total_pages` pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
    total_pages: usize,
    policy: NavPolicy,
    direction: Direction,
}

impl PageCursor {
    pub fn new(total_pages: usize, policy: NavPolicy) -> Self {
        Self { page: 0, total_pages, policy, direction: Direction::None }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn policy(&self) -> NavPolicy {
        self.policy
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Advance one page. Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        if self.total_pages == 0 {
            return false;
        }
        let last = self.total_pages - 1;
        match self.policy {
            NavPolicy::Clamped => {
                if self.page >= last {
                    return false;
                }
                self.page += 1;
                self.direction = Direction::Forward;
                true
            }
            NavPolicy::Wraparound => {
                let before = self.page;
                self.page = if self.page >= last { 0 } else { self.page + 1 };
                self.direction = Direction::Forward;
                before != self.page
            }
        }
    }

    /// Go back one page. Returns whether the page changed.
    pub fn prev(&mut self) -> bool {
        if self.total_pages == 0 {
            return false;
        }
        let last = self.total_pages - 1;
        match self.policy {
            NavPolicy::Clamped => {
                if self.page == 0 {
                    return false;
                }
                self.page -= 1;
                self.direction = Direction::Backward;
                true
            }
            NavPolicy::Wraparound => {
                let before = self.page;
                self.page = if self.page == 0 { last } else { self.page - 1 };
                self.direction = Direction::Backward;
                before != self.page
            }
        }
    }

    /// Back to page 0 with no in-flight direction
    pub fn reset(&mut self) {
        self.page = 0;
        self.direction = Direction::None;
    }

    /// The underlying sequence changed length; keep the page in range
    pub fn set_total_pages(&mut self, total_pages: usize) {
        self.total_pages = total_pages;
        self.page = self.page.min(total_pages.saturating_sub(1));
    }
}

// ============================================================================
// Carousel
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "page", rename_all = "lowercase")]
pub enum CarouselState {
    Idle(usize),
    Paused(usize),
}

/// Wraparound pager that auto-advances unless hovered.
///
/// `epoch` changes whenever something the timer depends on changes (pause
/// flag, page count). A timer started under an older epoch is stale.
#[derive(Debug, Clone)]
pub struct Carousel {
    cursor: PageCursor,
    paused: bool,
    epoch: u64,
}

impl Carousel {
    pub fn new(total_pages: usize) -> Self {
        Self { cursor: PageCursor::new(total_pages, NavPolicy::Wraparound), paused: false, epoch: 0 }
    }

    pub fn state(&self) -> CarouselState {
        if self.paused {
            CarouselState::Paused(self.cursor.page())
        } else {
            CarouselState::Idle(self.cursor.page())
        }
    }

    pub fn page(&self) -> usize {
        self.cursor.page()
    }

    pub fn total_pages(&self) -> usize {
        self.cursor.total_pages()
    }

    pub fn direction(&self) -> Direction {
        self.cursor.direction()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Timer fired. Ignored while paused or when there is nothing to cycle.
    pub fn on_interval_elapsed(&mut self) -> bool {
        if self.paused || self.cursor.total_pages() <= 1 {
            return false;
        }
        self.cursor.next()
    }

    /// Timer fired for a schedule started at `epoch`
    pub fn on_interval_elapsed_at(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.on_interval_elapsed()
    }

    pub fn hover_enter(&mut self) {
        if !self.paused {
            self.paused = true;
            self.epoch += 1;
        }
    }

    pub fn hover_leave(&mut self) {
        self.unpause();
    }

    /// Manual navigation always leaves the carousel idle
    pub fn next(&mut self) -> bool {
        self.unpause();
        self.cursor.next()
    }

    pub fn prev(&mut self) -> bool {
        self.unpause();
        self.cursor.prev()
    }

    /// Filter changed: back to the first page, direction cleared
    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    pub fn set_total_pages(&mut self, total_pages: usize) {
        if total_pages != self.cursor.total_pages() {
            self.cursor.set_total_pages(total_pages);
            self.epoch += 1;
        }
    }

    fn unpause(&mut self) {
        if self.paused {
            self.paused = false;
            self.epoch += 1;
        }
    }
}

/// A carousel shared between its owner and the auto-advance task.
///
/// Every mutation goes through `update`, which publishes the epoch so a
/// running timer can restart its interval.
#[derive(Clone)]
pub struct SharedCarousel {
    inner: Arc<Mutex<Carousel>>,
    epoch_tx: Arc<watch::Sender<u64>>,
}

impl SharedCarousel {
    pub fn new(carousel: Carousel) -> Self {
        let (epoch_tx, _) = watch::channel(carousel.epoch());
        Self { inner: Arc::new(Mutex::new(carousel)), epoch_tx: Arc::new(epoch_tx) }
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Carousel) -> R) -> R {
        let mut carousel = self.lock();
        let before = carousel.epoch();
        let result = f(&mut carousel);
        let after = carousel.epoch();
        drop(carousel);

        if after != before {
            self.epoch_tx.send_replace(after);
        }
        result
    }

    pub fn state(&self) -> CarouselState {
        self.lock().state()
    }

    pub fn page(&self) -> usize {
        self.lock().page()
    }

    fn lock(&self) -> MutexGuard<'_, Carousel> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Background timer advancing a carousel every `interval`.
///
/// Each epoch change restarts the full interval, so leaving hover never
/// advances early. Dropping the handle stops the timer.
pub struct AutoAdvance {
    handle: JoinHandle<()>,
}

impl AutoAdvance {
    pub fn spawn(carousel: SharedCarousel, interval: Duration) -> Self {
        let mut epoch_rx = carousel.epoch_tx.subscribe();

        let handle = tokio::spawn(async move {
            loop {
                let epoch = *epoch_rx.borrow_and_update();
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        carousel.update(|c| c.on_interval_elapsed_at(epoch));
                    }
                    changed = epoch_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        tracing::trace!("[Carousel] schedule restarted");
                    }
                }
            }
        });

        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
