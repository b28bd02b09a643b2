//! Discrete input events and the source that yields them each frame

/// Keys the demo distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Toggle debug draw
    B,
    /// Toggle slow motion
    N,
    /// Zoom out
    Up,
    /// Zoom in
    Down,
    Other,
}

/// One input event, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close or any system-level quit request
    Quit,
    KeyDown(Key),
    /// Window resized to a new client size in pixels
    Resized { width: u32, height: u32 },
    /// Anything else the window reports (key-up, mouse, focus)
    Other,
}

/// Yields every pending event exactly once
pub trait InputSource {
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// Scripted input for tests: one batch per frame, empty once exhausted
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct ScriptedInput {
    frames: std::collections::VecDeque<Vec<InputEvent>>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.frames.pop_front().unwrap_or_default()
    }
}
