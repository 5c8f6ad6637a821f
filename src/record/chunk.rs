use std::iter::FusedIterator;

/// Regroup any iterable into `Vec` chunks of `size` elements
///
/// The last chunk may be shorter. Element order is preserved within and
/// across chunks.
///
/// # Panics
/// Panics if `size` is 0, like [`slice::chunks`].
pub fn chunked<I>(iterable: I, size: usize) -> Chunked<I::IntoIter>
where
    I: IntoIterator,
{
    assert!(size != 0, "chunk size must be non-zero");
    Chunked {
        inner: iterable.into_iter().fuse(),
        size,
    }
}

/// Iterator returned by [`chunked`]
pub struct Chunked<I> {
    inner: std::iter::Fuse<I>,
    size: usize,
}

impl<I: Iterator> Iterator for Chunked<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk: Vec<_> = self.inner.by_ref().take(self.size).collect();
        if chunk.is_empty() { None } else { Some(chunk) }
    }
}

impl<I: Iterator> FusedIterator for Chunked<I> {}
