use alloc::vec::Vec;
use core::time::Duration;

/// Time each flipbook frame stays on screen.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(500);

/// Frames shown one after another in a loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flipbook<T> {
    frames: Vec<T>,
    current: usize,
}

impl<T> Default for Flipbook<T> {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            current: 0,
        }
    }
}

impl<T> Flipbook<T> {
    pub fn new(frames: Vec<T>) -> Self {
        Self { frames, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&T> {
        self.frames.get(self.current)
    }

    /// Steps to the next frame, wrapping after the last. Returns false when there is nothing to show.
    pub fn advance(&mut self) -> bool {
        if self.frames.is_empty() {
            return false;
        }
        self.current = (self.current + 1) % self.frames.len();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_around() {
        let mut book = Flipbook::new(alloc::vec!['a', 'b', 'c']);
        assert_eq!(book.current(), Some(&'a'));

        let seen: Vec<char> = (0..4)
            .map(|_| {
                book.advance();
                *book.current().unwrap()
            })
            .collect();
        assert_eq!(seen, ['b', 'c', 'a', 'b']);
    }

    #[test]
    fn empty_flipbook_never_advances() {
        let mut book = Flipbook::<u8>::default();
        assert!(!book.advance());
        assert_eq!(book.current(), None);
        assert_eq!(book.index(), 0);
    }
}
