//! Decoded frames and the sources that produce them.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::FrameError;

/// A decoded video frame.
///
/// Pixel data is shared behind an `Arc` so every tracker can read the same
/// frame without copying it.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            data: data.into(),
        }
    }

    /// A frame with dimensions only, for sources that carry no pixels.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, Vec::<u8>::new())
    }
}

/// Trait for frame providers (video files, image sequences, cameras).
///
/// Implement this trait to feed decoded frames into the evaluation loop.
pub trait FrameSource {
    /// Read the next frame.
    ///
    /// # Returns
    /// `Ok(Some(frame))` for a frame, `Ok(None)` once the source is exhausted,
    /// or an error if reading failed.
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        (**self).next_frame()
    }
}

/// Frame source backed by a pre-decoded list of frames.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFrames {
    frames: VecDeque<Result<Frame, FrameError>>,
}

impl InMemoryFrames {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().map(Ok).collect(),
        }
    }

    /// `count` blank frames of the given size.
    pub fn blank(count: usize, width: u32, height: u32) -> Self {
        Self::new((0..count).map(|_| Frame::blank(width, height)))
    }

    /// Queue a read failure after the frames already queued.
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.frames.push_back(Err(FrameError(message.into())));
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for InMemoryFrames {
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        self.frames.pop_front().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_frames() {
        let mut source = InMemoryFrames::blank(2, 64, 48);
        source.push_error("corrupt");

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!((first.width, first.height), (64, 48));
        assert!(source.next_frame().unwrap().is_some());
        assert_eq!(source.next_frame(), Err(FrameError("corrupt".into())));
        assert_eq!(source.next_frame(), Ok(None));
    }
}
