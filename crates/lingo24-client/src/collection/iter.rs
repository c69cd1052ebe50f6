//! Lazy iteration over paged collections.

use std::ops::{Bound, RangeBounds};

use super::page::Page;
use super::{PagedCollection, Resource};
use crate::error::Result;

enum State {
    /// Nothing fetched yet.
    Start(u64),
    /// Draining a fetched page.
    Page {
        content: std::vec::IntoIter<serde_json::Value>,
        next: Option<String>,
    },
    Done,
}

/// Iterator over the items of a collection, fetching pages on demand.
///
/// A 404 for the first page or a next-link ends the sequence quietly. Any
/// other failure, including a record that does not decode, is yielded once
/// as an `Err` and ends it.
pub struct Items<'a, T: Resource> {
    collection: &'a PagedCollection<T>,
    state: State,
    follow_links: bool,
}

impl<'a, T: Resource> Items<'a, T> {
    pub(crate) fn new(collection: &'a PagedCollection<T>, start_page: u64, follow_links: bool) -> Self {
        Self {
            collection,
            state: State::Start(start_page),
            follow_links,
        }
    }

    fn load(page: Option<Page>) -> State {
        match page {
            Some(page) => State::Page {
                next: page.next_link().map(str::to_owned),
                content: page.content.into_iter(),
            },
            None => State::Done,
        }
    }
}

impl<T: Resource> Iterator for Items<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Start(page_index) => match self.collection.fetch_page(page_index) {
                    Ok(page) => self.state = Self::load(page),
                    Err(e) => return Some(Err(e)),
                },
                State::Page { mut content, next } => {
                    if let Some(record) = content.next() {
                        let item = self.collection.make(record);
                        if item.is_ok() {
                            self.state = State::Page { content, next };
                        }
                        return Some(item);
                    }
                    let href = next.filter(|_| self.follow_links)?;
                    tracing::debug!(%href, "following next link");
                    match self.collection.fetch(&href) {
                        Ok(page) => self.state = Self::load(page),
                        Err(e) => return Some(Err(e)),
                    }
                }
                State::Done => return None,
            }
        }
    }
}

/// Positional window over a fallible iterator.
///
/// Counts only `Ok` items; an `Err` is passed through and ends the slice.
/// Stops pulling from the inner iterator once `stop` is reached.
pub struct Slice<I> {
    inner: I,
    position: usize,
    start: usize,
    stop: Option<usize>,
    step: usize,
    done: bool,
}

impl<I> Slice<I> {
    pub(crate) fn new(inner: I, start: usize, stop: Option<usize>, step: usize) -> Self {
        Self {
            inner,
            position: 0,
            start,
            stop,
            step: step.max(1),
            done: false,
        }
    }
}

impl<I, T> Iterator for Slice<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.stop.is_some_and(|stop| self.position >= stop) {
                self.done = true;
                break;
            }

            let item = match self.inner.next() {
                Some(Ok(item)) => item,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            };

            let position = self.position;
            self.position += 1;
            if position >= self.start && (position - self.start) % self.step == 0 {
                return Some(Ok(item));
            }
        }
        None
    }
}

/// Absolute `(start, stop)` of a range; `stop` is exclusive.
pub(crate) fn range_bounds(range: &impl RangeBounds<usize>) -> (Option<usize>, Option<usize>) {
    let start = match range.start_bound() {
        Bound::Included(&s) => Some(s),
        Bound::Excluded(&s) => Some(s.saturating_add(1)),
        Bound::Unbounded => None,
    };
    let stop = match range.end_bound() {
        Bound::Included(&e) => Some(e.saturating_add(1)),
        Bound::Excluded(&e) => Some(e),
        Bound::Unbounded => None,
    };
    (start, stop)
}
