//! Frame loop and the state it owns
//!
//! `sim_loop` drives the frame; `input`, `present` and `clock::FramePacer`
//! are the seams to the window, the GPU and the wall clock.

pub mod clock;
pub mod input;
pub mod present;
pub mod sim_loop;
pub mod state;
pub mod zoom;

pub use clock::{FrameClock, FramePacer, SimulationClock};
pub use input::{InputEvent, InputSource, Key};
pub use present::Presenter;
pub use sim_loop::{Flow, SimContext, run, run_frame};
pub use state::{RunState, Transition};
pub use zoom::{DisplayImage, ResizeGuard, ZoomState};
