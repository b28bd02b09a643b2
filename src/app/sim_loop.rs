//! Fixed-timestep frame loop
//!
//! Each frame: step physics `sub_steps_per_frame` times, drain input, update
//! the zoomed background, clear, draw, present, then pace to the frame cap.
//! Physics speed depends on `fixed_dt * sub_steps_per_frame`, never on the
//! measured frame time.

use std::sync::Arc;

use glam::Vec2;

use super::clock::{FramePacer, SimulationClock};
use super::input::{InputEvent, InputSource};
use super::present::Presenter;
use super::state::{RunState, Transition};
use super::zoom::{DisplayImage, ResizeGuard, ZoomState};
use crate::asset::BackgroundImage;
use crate::error::DemoResult;
use crate::settings::Settings;
use crate::sim::{BallParams, BodyHandle, World, spawn_ball, spawn_walls};

/// Whether the loop keeps going after a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// All loop state, owned by the single driver
#[derive(Debug)]
pub struct SimContext {
    pub clock: SimulationClock,
    pub state: RunState,
    pub zoom: ZoomState,
    pub debug: bool,
    pub image: DisplayImage,
    pub world: World,
    pub ball: BodyHandle,
    pub resize_guard: ResizeGuard,
    pub clear_color: [u8; 3],
    /// Latest window size reported this frame, forwarded to the presenter
    pub pending_resize: Option<(u32, u32)>,
    /// Frames fully drawn since start
    pub frames: u64,
}

impl SimContext {
    /// Build the demo scenario: walls (optional) and one ball at the window center
    pub fn new(settings: &Settings, background: Arc<BackgroundImage>) -> Self {
        let physics = &settings.physics;
        let (width, height) = (settings.window.width as f32, settings.window.height as f32);

        let mut world = World::new();
        if physics.walls {
            spawn_walls(&mut world, width, height);
        }
        let params = BallParams {
            radius: physics.ball_radius,
            speed: physics.ball_speed,
            ..BallParams::default()
        }
        .with_heading_deg(physics.initial_heading_deg);
        let ball = spawn_ball(&mut world, Vec2::new(width / 2.0, height / 2.0), params);

        Self {
            clock: SimulationClock::new(
                physics.fixed_dt,
                physics.substeps,
                settings.display.target_fps,
            ),
            state: RunState::Running,
            zoom: ZoomState::NONE,
            debug: false,
            image: DisplayImage::new(background),
            world,
            ball,
            resize_guard: settings.display.resize_guard,
            clear_color: settings.display.clear_color,
            pending_resize: None,
            frames: 0,
        }
    }
}

/// Step the world `sub_steps_per_frame` times by `fixed_dt`
pub fn process_time(ctx: &mut SimContext) {
    for _ in 0..ctx.clock.sub_steps_per_frame() {
        ctx.world.step(ctx.clock.fixed_dt);
    }
}

/// Consume one frame's events in order.
///
/// Zoom starts the batch at zero. Quit is honoured in every state and stops
/// processing at once; everything else goes to the current state's handler.
pub fn process_events(ctx: &mut SimContext, events: &[InputEvent]) -> Flow {
    ctx.zoom = ZoomState::NONE;

    for &event in events {
        if event == InputEvent::Quit {
            log::info!("Quit requested");
            ctx.state = RunState::Exited;
            return Flow::Quit;
        }
        if let InputEvent::Resized { width, height } = event {
            ctx.pending_resize = Some((width, height));
        }

        let handler = ctx.state.behavior().on_event;
        if let Transition::To(next) = handler(ctx, event) {
            log::debug!("Run state {:?} -> {:?}", ctx.state, next);
            ctx.state = next;
            if next.is_exited() {
                return Flow::Quit;
            }
        }
    }
    Flow::Continue
}

/// Rescale the display image by this frame's zoom deltas
pub fn update(ctx: &mut SimContext) -> DemoResult<()> {
    if ctx.image.apply_zoom(ctx.zoom, ctx.resize_guard)? {
        let (w, h) = ctx.image.size();
        log::debug!("Background scaled to {}x{}", w, h);
    }
    Ok(())
}

pub fn clear_screen(ctx: &SimContext, presenter: &mut impl Presenter) {
    presenter.clear(ctx.clear_color);
}

/// Debug overlay (when on), then the background at the origin (always)
pub fn draw(ctx: &SimContext, presenter: &mut impl Presenter) {
    if ctx.debug {
        presenter.draw_debug(&ctx.world.debug_shapes());
    }
    presenter.blit(&ctx.image, Vec2::ZERO);
}

/// Run one loop iteration
pub fn run_frame(
    ctx: &mut SimContext,
    input: &mut impl InputSource,
    presenter: &mut impl Presenter,
    pacer: &mut impl FramePacer,
) -> DemoResult<Flow> {
    let advancing = ctx.state.advances();
    if advancing {
        process_time(ctx);
    }

    let events = input.poll_events();
    if process_events(ctx, &events) == Flow::Quit {
        return Ok(Flow::Quit);
    }
    if let Some((width, height)) = ctx.pending_resize.take() {
        presenter.resize(width, height);
    }

    if advancing {
        update(ctx)?;
        clear_screen(ctx, presenter);
        draw(ctx, presenter);
        presenter.flip()?;
        ctx.frames += 1;
    }

    pacer.tick(ctx.clock.target_frame_rate);
    presenter.set_caption(&format!("fps: {}", pacer.fps()));
    Ok(Flow::Continue)
}

/// Drive frames until quit or an error
pub fn run(
    ctx: &mut SimContext,
    input: &mut impl InputSource,
    presenter: &mut impl Presenter,
    pacer: &mut impl FramePacer,
) -> DemoResult<()> {
    log::info!(
        "Loop running: dt={:.5}s, {} sub-steps/frame ({:.4}s simulated), {} fps cap, {} guard",
        ctx.clock.fixed_dt,
        ctx.clock.sub_steps_per_frame(),
        ctx.clock.simulated_per_frame(),
        ctx.clock.target_frame_rate,
        ctx.resize_guard.as_str()
    );
    while run_frame(ctx, input, presenter, pacer)? == Flow::Continue {}
    log::info!("Loop exited after {} frames", ctx.frames);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::input::{Key, ScriptedInput};
    use crate::app::present::recording::{Call, RecordingPresenter};
    use crate::error::DemoError;

    /// Pacer that never sleeps
    #[derive(Default)]
    struct NoPacer {
        ticks: u32,
    }

    impl FramePacer for NoPacer {
        fn tick(&mut self, _target_fps: u32) {
            self.ticks += 1;
        }

        fn fps(&self) -> f32 {
            60.0
        }
    }

    fn background(w: u32, h: u32) -> Arc<BackgroundImage> {
        Arc::new(BackgroundImage {
            width: w,
            height: h,
            rgba: vec![255; (w * h * 4) as usize],
        })
    }

    fn context() -> SimContext {
        SimContext::new(&Settings::default(), background(100, 50))
    }

    fn key(k: Key) -> InputEvent {
        InputEvent::KeyDown(k)
    }

    #[test]
    fn test_new_context_spawns_ball_and_walls() {
        let ctx = context();
        assert_eq!(ctx.world.bodies().len(), 1);
        assert_eq!(ctx.world.walls().len(), 4);
        assert_eq!(ctx.state, RunState::Running);
        assert_eq!(ctx.image.size(), (100, 50));
        let ball = ctx.world.body(ctx.ball).unwrap();
        assert_eq!(ball.pos, Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_process_time_steps_substeps() {
        let mut ctx = context();
        process_time(&mut ctx);
        assert_eq!(ctx.world.steps, 2);
        ctx.clock.toggle_slow_motion();
        process_time(&mut ctx);
        assert_eq!(ctx.world.steps, 3);
    }

    #[test]
    fn test_ball_speed_fixed_every_frame() {
        let mut ctx = context();
        for _ in 0..600 {
            process_time(&mut ctx);
            let speed = ctx.world.body(ctx.ball).unwrap().speed();
            assert!((speed - 400.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_n_toggles_substeps_two_value_cycle() {
        let mut ctx = context();
        assert_eq!(ctx.clock.sub_steps_per_frame(), 2);
        process_events(&mut ctx, &[key(Key::N)]);
        assert_eq!(ctx.clock.sub_steps_per_frame(), 1);
        process_events(&mut ctx, &[key(Key::N)]);
        assert_eq!(ctx.clock.sub_steps_per_frame(), 2);
    }

    #[test]
    fn test_b_toggles_debug() {
        let mut ctx = context();
        process_events(&mut ctx, &[key(Key::B)]);
        assert!(ctx.debug);
        process_events(&mut ctx, &[key(Key::B), key(Key::B)]);
        assert!(ctx.debug);
    }

    #[test]
    fn test_zoom_last_event_wins() {
        let mut ctx = context();
        process_events(&mut ctx, &[key(Key::Up), key(Key::Down)]);
        assert_eq!(ctx.zoom, ZoomState::zoom_in((100, 50)));

        process_events(&mut ctx, &[key(Key::Up), InputEvent::Other]);
        assert_eq!(ctx.zoom, ZoomState::NONE);

        process_events(&mut ctx, &[key(Key::Up), key(Key::Other)]);
        assert_eq!(ctx.zoom, ZoomState::NONE);
    }

    #[test]
    fn test_toggles_keep_zoom() {
        let mut ctx = context();
        process_events(&mut ctx, &[key(Key::Up), key(Key::B), key(Key::N)]);
        assert_eq!(ctx.zoom, ZoomState::zoom_out((100, 50)));
    }

    #[test]
    fn test_zoom_does_not_accumulate_across_frames() {
        let mut ctx = context();
        let mut input = ScriptedInput::new([vec![key(Key::Up)], vec![]]);
        let mut presenter = RecordingPresenter::default();
        let mut pacer = NoPacer::default();

        run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();
        assert_eq!(ctx.zoom, ZoomState::zoom_out((100, 50)));
        let after_first = ctx.image.size();
        assert_eq!(after_first, (99, 48));

        run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();
        assert_eq!(ctx.zoom, ZoomState::NONE);
        assert_eq!(ctx.image.size(), after_first);
    }

    #[test]
    fn test_quit_stops_before_draw() {
        let mut ctx = context();
        let mut input = ScriptedInput::new([vec![key(Key::B), InputEvent::Quit, key(Key::N)]]);
        let mut presenter = RecordingPresenter::default();
        let mut pacer = NoPacer::default();

        let flow = run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();

        assert_eq!(flow, Flow::Quit);
        assert_eq!(ctx.state, RunState::Exited);
        // Events before quit were handled, events after were not
        assert!(ctx.debug);
        assert_eq!(ctx.clock.sub_steps_per_frame(), 2);
        // One frame of physics happened before draining input; nothing after
        assert_eq!(ctx.world.steps, 2);
        assert!(presenter.calls.is_empty());
        assert_eq!(pacer.ticks, 0);
    }

    #[test]
    fn test_run_returns_on_quit() {
        let mut ctx = context();
        let mut input = ScriptedInput::new([vec![], vec![], vec![InputEvent::Quit]]);
        let mut presenter = RecordingPresenter::default();
        let mut pacer = NoPacer::default();

        run(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();

        assert_eq!(ctx.frames, 2);
        assert_eq!(ctx.world.steps, 6);
        assert_eq!(presenter.count(|c| *c == Call::Flip), 2);
    }

    #[test]
    fn test_frame_draw_order() {
        let mut ctx = context();
        let mut input = ScriptedInput::new([vec![]]);
        let mut presenter = RecordingPresenter::default();
        let mut pacer = NoPacer::default();

        run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();

        assert_eq!(
            presenter.calls,
            vec![
                Call::Clear([225, 225, 225]),
                Call::Blit {
                    size: (100, 50),
                    origin: Vec2::ZERO
                },
                Call::Flip,
                Call::Caption("fps: 60".to_string()),
            ]
        );
    }

    #[test]
    fn test_debug_overlay_does_not_suppress_background() {
        let mut ctx = context();
        let mut input = ScriptedInput::new([vec![key(Key::B)]]);
        let mut presenter = RecordingPresenter::default();
        let mut pacer = NoPacer::default();

        run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();

        let frame = presenter.last_frame();
        assert_eq!(frame[0], Call::Clear([225, 225, 225]));
        // 4 walls + 1 ball, then the background on top
        assert_eq!(frame[1], Call::DrawDebug(5));
        assert!(matches!(frame[2], Call::Blit { .. }));
        assert_eq!(frame[3], Call::Flip);
    }

    #[test]
    fn test_resize_forwarded_and_resets_zoom() {
        let mut ctx = context();
        let mut input = ScriptedInput::new([vec![
            key(Key::Down),
            InputEvent::Resized {
                width: 800,
                height: 600,
            },
        ]]);
        let mut presenter = RecordingPresenter::default();
        let mut pacer = NoPacer::default();

        run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();

        assert_eq!(presenter.calls[0], Call::Resize(800, 600));
        assert_eq!(ctx.zoom, ZoomState::NONE);
        assert_eq!(ctx.image.size(), (100, 50));
    }

    #[test]
    fn test_paused_state_idles_but_honours_quit() {
        let mut ctx = context();
        ctx.state = RunState::Paused;
        let mut input = ScriptedInput::new([vec![key(Key::B)], vec![InputEvent::Quit]]);
        let mut presenter = RecordingPresenter::default();
        let mut pacer = NoPacer::default();

        let flow = run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(!ctx.debug);
        assert_eq!(ctx.world.steps, 0);
        assert_eq!(presenter.count(|c| *c == Call::Flip), 0);
        assert_eq!(pacer.ticks, 1);

        let flow = run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();
        assert_eq!(flow, Flow::Quit);
        assert_eq!(ctx.state, RunState::Exited);
    }

    #[test]
    fn test_current_size_guard_error_propagates() {
        let mut settings = Settings::default();
        settings.display.resize_guard = ResizeGuard::CurrentSize;
        // Square image: zoom out shrinks each side by 1 per frame
        let mut ctx = SimContext::new(&settings, background(2, 2));
        let mut input = ScriptedInput::new(vec![vec![key(Key::Up)]; 3]);
        let mut presenter = RecordingPresenter::default();
        let mut pacer = NoPacer::default();

        run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();
        run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();
        assert_eq!(ctx.image.size(), (0, 0));

        // Current size (0,0) passes the guard; (-1,-1) cannot be scaled to
        let err = run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap_err();
        assert!(matches!(err, DemoError::InvalidImageSize { width: -1, height: -1 }));
    }

    #[test]
    fn test_projected_size_guard_keeps_running() {
        let mut ctx = SimContext::new(&Settings::default(), background(2, 2));
        let mut input = ScriptedInput::new(vec![vec![key(Key::Up)]; 3]);
        let mut presenter = RecordingPresenter::default();
        let mut pacer = NoPacer::default();

        for _ in 0..3 {
            run_frame(&mut ctx, &mut input, &mut presenter, &mut pacer).unwrap();
        }
        assert_eq!(ctx.image.size(), (0, 0));
        assert_eq!(ctx.frames, 3);
    }
}
