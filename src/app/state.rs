//! Run-state machine
//!
//! Each state has one row in `STATE_TABLE`: whether the world advances and
//! which handler sees input events. Adding a state means adding a row.

use super::input::{InputEvent, Key};
use super::sim_loop::SimContext;
use super::zoom::ZoomState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running = 0,
    Paused = 1,
    Menu = 2,
    Exited = 3,
}

/// What an event handler asks of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    To(RunState),
}

type EventHandler = fn(&mut SimContext, InputEvent) -> Transition;

/// One row of the transition table
pub struct StateBehavior {
    pub state: RunState,
    /// Step physics, update, draw and present while in this state
    pub advances: bool,
    pub on_event: EventHandler,
}

static STATE_TABLE: [StateBehavior; 4] = [
    StateBehavior {
        state: RunState::Running,
        advances: true,
        on_event: running_on_event,
    },
    StateBehavior {
        state: RunState::Paused,
        advances: false,
        on_event: ignore_event,
    },
    StateBehavior {
        state: RunState::Menu,
        advances: false,
        on_event: ignore_event,
    },
    StateBehavior {
        state: RunState::Exited,
        advances: false,
        on_event: ignore_event,
    },
];

impl RunState {
    pub fn behavior(self) -> &'static StateBehavior {
        &STATE_TABLE[self as usize]
    }

    pub fn advances(self) -> bool {
        self.behavior().advances
    }

    pub fn is_exited(self) -> bool {
        self == RunState::Exited
    }
}

/// Running: debug/slow-mo toggles and zoom, last event wins for zoom
fn running_on_event(ctx: &mut SimContext, event: InputEvent) -> Transition {
    match event {
        InputEvent::KeyDown(Key::B) => {
            ctx.debug = !ctx.debug;
            log::debug!("Debug draw {}", if ctx.debug { "on" } else { "off" });
        }
        InputEvent::KeyDown(Key::N) => {
            ctx.clock.toggle_slow_motion();
            log::debug!(
                "Slow motion: {} ({} sub-steps per frame)",
                ctx.clock.is_slow_motion(),
                ctx.clock.sub_steps_per_frame()
            );
        }
        InputEvent::KeyDown(Key::Up) => {
            ctx.zoom = ZoomState::zoom_out(ctx.image.original().size());
        }
        InputEvent::KeyDown(Key::Down) => {
            ctx.zoom = ZoomState::zoom_in(ctx.image.original().size());
        }
        _ => ctx.zoom = ZoomState::NONE,
    }
    Transition::Stay
}

fn ignore_event(_ctx: &mut SimContext, _event: InputEvent) -> Transition {
    Transition::Stay
}
