//! Real-time driver: maps the page's virtual clock onto tokio time.

use std::time::Duration;

use super::page::Page;

/// Sleep until each pending callback falls due and fire it, until none remain.
///
/// Returns the number of callbacks fired. Callbacks that keep rescheduling
/// themselves keep this future alive; use [`run_for`] to bound it.
pub async fn run_until_idle(page: &mut Page) -> usize {
    let mut fired = 0;
    while let Some(due) = page.next_due() {
        let wait = due.saturating_sub(page.now());
        if wait > 0 {
            tokio::time::sleep(Duration::from_millis(wait)).await;
        }
        fired += page.advance_to(due);
    }
    fired
}

/// Drive the page in real time for `duration`, firing callbacks as they fall due.
pub async fn run_for(page: &mut Page, duration: Duration) -> usize {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    let deadline = page.now().saturating_add(millis);
    let mut fired = 0;
    loop {
        let next = page.next_due().filter(|&due| due <= deadline).unwrap_or(deadline);
        let wait = next.saturating_sub(page.now());
        if wait > 0 {
            tokio::time::sleep(Duration::from_millis(wait)).await;
        }
        fired += page.advance_to(next);
        if next >= deadline {
            return fired;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[tokio::test(start_paused = true)]
    async fn run_until_idle_fires_everything() {
        let mut page = Page::new();
        let count = Rc::new(Cell::new(0));
        for delay in [5, 50, 500] {
            let count = Rc::clone(&count);
            page.set_timeout(delay, move |_| count.set(count.get() + 1));
        }
        let started = tokio::time::Instant::now();
        assert_eq!(run_until_idle(&mut page).await, 3);
        assert_eq!(count.get(), 3);
        assert_eq!(page.now(), 500);
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn run_for_stops_at_deadline() {
        let mut page = Page::new();
        let count = Rc::new(Cell::new(0));
        for delay in [10, 100] {
            let count = Rc::clone(&count);
            page.set_timeout(delay, move |_| count.set(count.get() + 1));
        }
        assert_eq!(run_for(&mut page, Duration::from_millis(50)).await, 1);
        assert_eq!(page.now(), 50);
        assert_eq!(page.pending_timers(), 1);
    }

    #[test]
    fn idle_page_returns_immediately() {
        let mut page = Page::new();
        assert_eq!(tokio_test::block_on(run_until_idle(&mut page)), 0);
    }
}
