//! Overlay event loop: owns the window, the renderer, and the engine's tick
//! cadence. All engine state lives on this thread; window events are handed
//! over through the engine's input feed, never applied directly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reticle::{FrameScheduler, InputEvent, RenderFrame};
use thiserror::Error;
use tracing::{info, warn};
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Fullscreen, WindowBuilder, WindowLevel};

use crate::bindings;
use crate::config_store::{ConfigStore, OverlayConfig};
use crate::renderer::OverlayRenderer;
use crate::visibility::{PresenceProbe, VisibilityGate};

pub const TARGET_TICKS_PER_SECOND: u32 = 60;
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);
const MIN_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create overlay window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] pixels::Error),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run(
    mut config: OverlayConfig,
    mut store: ConfigStore,
    probe: Box<dyn PresenceProbe>,
) -> Result<(), OverlayError> {
    let event_loop = EventLoop::new().map_err(OverlayError::CreateEventLoop)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Reticle")
            .with_decorations(false)
            .with_transparent(true)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_fullscreen(Some(Fullscreen::Borderless(None)))
            .build(&event_loop)
            .map_err(OverlayError::CreateWindow)?,
    );
    // Click-through; not every backend supports it, and a solid overlay is
    // still usable for tuning.
    if let Err(error) = window.set_cursor_hittest(false) {
        warn!(error = %error, "cursor_hittest_unavailable");
    }

    let mut renderer =
        OverlayRenderer::new(Arc::clone(&window)).map_err(OverlayError::CreateRenderer)?;

    let (feed, queue) = reticle::channel();
    let mut scheduler = FrameScheduler::new(config.engine, queue, rand::random::<u64>());
    let poll_interval =
        Duration::from_millis(config.behavior.poll_interval_ms.max(MIN_POLL_INTERVAL_MS));
    let mut gate = VisibilityGate::new(probe, config.behavior.always_visible, poll_interval);
    scheduler.set_active(gate.poll(Instant::now()));

    let fixed_dt = Duration::from_secs_f64(1.0 / TARGET_TICKS_PER_SECOND as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_poll_instant = Instant::now();
    let mut latest_frame: Option<RenderFrame> = None;

    info!(
        target_tps = TARGET_TICKS_PER_SECOND,
        poll_interval_ms = poll_interval.as_millis() as u64,
        config_path = %store.path().display(),
        "overlay_started"
    );

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let Some(transition) = bindings::key_transition(&event) {
                        feed.send(transition);
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    if let Some(transition) = bindings::button_transition(button, state) {
                        feed.send(transition);
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    feed.send(InputEvent::PointerMoved {
                        x: position.x as f32,
                        y: position.y as f32,
                    });
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();

                    if now.saturating_duration_since(last_poll_instant) >= poll_interval {
                        last_poll_instant = now;
                        scheduler.set_active(gate.poll(now));
                        if let Some(update) = store.maybe_reload() {
                            info!("config_reloaded");
                            gate.set_always_visible(update.behavior.always_visible);
                            scheduler.replace_config(update.engine);
                            config = update;
                            scheduler.set_active(gate.poll(now));
                        }
                    }

                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;
                    accumulator = accumulator
                        .saturating_add(clamp_frame_delta(raw_frame_dt, MAX_FRAME_DELTA));

                    let plan = plan_tick(accumulator, fixed_dt);
                    accumulator = plan.remaining_accumulator;
                    if plan.run_tick {
                        latest_frame = scheduler.tick(fixed_dt_seconds);
                    }
                    if plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                            "tick_backlog_dropped"
                        );
                    }

                    if let Err(error) = renderer.render(latest_frame.as_ref(), &config.appearance)
                    {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(OverlayError::EventLoopRun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TickPlan {
    run_tick: bool,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

/// At most one tick of catch-up per frame: an overrun drops the backlog and
/// proceeds as if a single tick elapsed, trading a bounded slowdown for a
/// burst of compressed motion.
fn plan_tick(accumulator: Duration, fixed_dt: Duration) -> TickPlan {
    if accumulator < fixed_dt {
        return TickPlan {
            run_tick: false,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        };
    }

    let after = accumulator - fixed_dt;
    if after >= fixed_dt {
        TickPlan {
            run_tick: true,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: after,
        }
    } else {
        TickPlan {
            run_tick: true,
            remaining_accumulator: after,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let clamped = clamp_frame_delta(Duration::from_millis(600), MAX_FRAME_DELTA);
        assert_eq!(clamped, MAX_FRAME_DELTA);
    }

    #[test]
    fn plan_tick_waits_below_one_interval() {
        let plan = plan_tick(Duration::from_millis(10), Duration::from_millis(16));
        assert!(!plan.run_tick);
        assert_eq!(plan.remaining_accumulator, Duration::from_millis(10));
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_tick_runs_one_tick_and_keeps_remainder() {
        let plan = plan_tick(Duration::from_millis(20), Duration::from_millis(16));
        assert!(plan.run_tick);
        assert_eq!(plan.remaining_accumulator, Duration::from_millis(4));
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_tick_drops_backlog_instead_of_bursting() {
        let plan = plan_tick(Duration::from_millis(100), Duration::from_millis(16));
        assert!(plan.run_tick);
        assert_eq!(plan.remaining_accumulator, Duration::ZERO);
        assert_eq!(plan.dropped_backlog, Duration::from_millis(84));
    }
}
