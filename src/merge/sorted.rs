use std::iter::{Fuse, FusedIterator, Peekable};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use futures::stream::{self, StreamExt};
use pin_project_lite::pin_project;

/// Lazily merge two individually sorted iterators into one sorted iterator
///
/// `precedes(a, b)` returns true when `a` should be emitted before (or
/// together with) `b`. On ties the left head wins. Once either side is
/// exhausted the remainder of the other is passed through unchanged.
///
/// At most one element per side is buffered.
pub fn merge_sorted<L, R, F>(left: L, right: R, precedes: F) -> MergeSortedIter<L::IntoIter, R::IntoIter, F>
where
    L: IntoIterator,
    R: IntoIterator<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> bool,
{
    MergeSortedIter {
        left: left.into_iter().fuse().peekable(),
        right: right.into_iter().fuse().peekable(),
        precedes,
    }
}

/// Iterator returned by [`merge_sorted`]
pub struct MergeSortedIter<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
{
    left: Peekable<Fuse<L>>,
    right: Peekable<Fuse<R>>,
    precedes: F,
}

impl<L, R, F> Iterator for MergeSortedIter<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> bool,
{
    type Item = L::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let take_left = match (self.left.peek(), self.right.peek()) {
            (Some(l), Some(r)) => (self.precedes)(l, r),
            (Some(_), None) => true,
            (None, _) => false,
        };

        if take_left {
            self.left.next()
        } else {
            self.right.next()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (l_lo, l_hi) = self.left.size_hint();
        let (r_lo, r_hi) = self.right.size_hint();
        let hi = match (l_hi, r_hi) {
            (Some(l), Some(r)) => l.checked_add(r),
            _ => None,
        };
        (l_lo.saturating_add(r_lo), hi)
    }
}

impl<L, R, F> FusedIterator for MergeSortedIter<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> bool,
{
}

pin_project! {
    /// Async counterpart of [`merge_sorted`] over two sorted streams
    ///
    /// Both sides are polled until each has a head (or is exhausted)
    /// before anything is emitted, so the ordering decision always sees
    /// both candidates.
    #[must_use = "streams do nothing unless polled"]
    pub struct MergeSorted<L, R, F>
    where
        L: Stream,
    {
        #[pin]
        left: stream::Fuse<L>,
        #[pin]
        right: stream::Fuse<R>,
        left_head: Option<L::Item>,
        right_head: Option<L::Item>,
        precedes: F,
    }
}

impl<L, R, F> MergeSorted<L, R, F>
where
    L: Stream,
    R: Stream<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> bool,
{
    pub fn new(left: L, right: R, precedes: F) -> Self {
        Self {
            left: left.fuse(),
            right: right.fuse(),
            left_head: None,
            right_head: None,
            precedes,
        }
    }
}

impl<L, R, F> Stream for MergeSorted<L, R, F>
where
    L: Stream,
    R: Stream<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> bool,
{
    type Item = L::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        let mut waiting = false;
        if this.left_head.is_none() && !this.left.is_done() {
            match this.left.as_mut().poll_next(cx) {
                Poll::Ready(item) => *this.left_head = item,
                Poll::Pending => waiting = true,
            }
        }
        if this.right_head.is_none() && !this.right.is_done() {
            match this.right.as_mut().poll_next(cx) {
                Poll::Ready(item) => *this.right_head = item,
                Poll::Pending => waiting = true,
            }
        }
        if waiting {
            return Poll::Pending;
        }

        let item = match (this.left_head.take(), this.right_head.take()) {
            (Some(l), Some(r)) => {
                if (this.precedes)(&l, &r) {
                    *this.right_head = Some(r);
                    Some(l)
                } else {
                    *this.left_head = Some(l);
                    Some(r)
                }
            }
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        };

        Poll::Ready(item)
    }
}
