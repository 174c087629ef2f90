//! End-to-end session tests: commands in, painted pixels out, clean
//! shutdown.

use std::time::{Duration, Instant};

use fractile_engine::{Canvas, Command, CommandOutcome, EngineConfig, RenderSession};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

fn small_config() -> EngineConfig {
    EngineConfig {
        canvas_width: 128,
        canvas_height: 72,
        max_iterations: 64,
        workers: Some(2),
        ..EngineConfig::default()
    }
}

fn wait_idle(session: &RenderSession) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while !session.progress().idle() {
        assert!(Instant::now() < deadline, "render did not drain in time");
        std::thread::sleep(Duration::from_millis(1));
    }
}

fn pixel_histogram(session: &RenderSession) -> (usize, usize) {
    let canvas = session.canvas();
    let black = Canvas::pack(0, 0, 0);
    let mut blacks = 0;
    let mut colored = 0;
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            if canvas.get(x, y) == black {
                blacks += 1;
            } else {
                colored += 1;
            }
        }
    }
    (blacks, colored)
}

#[test]
fn startup_renders_the_default_view() {
    init_tracing();
    let session = RenderSession::new(small_config()).unwrap();
    wait_idle(&session);

    let (blacks, colored) = pixel_histogram(&session);
    assert!(blacks > 0, "default view must contain in-set pixels");
    assert!(colored > 0, "default view must contain escaped pixels");
    session.shutdown();
}

#[test]
fn command_sequence_keeps_rendering() {
    init_tracing();
    let mut session = RenderSession::new(small_config()).unwrap();
    wait_idle(&session);

    for command in [
        Command::ZoomIn,
        Command::PanLeft,
        Command::PanUp,
        Command::IncreaseIterations,
        Command::TogglePrecision,
        Command::ZoomOut,
        Command::ResetView,
    ] {
        assert_eq!(session.apply(command).unwrap(), CommandOutcome::Continue);
    }
    wait_idle(&session);

    // After the reset the canvas must again be the default view: a mix of
    // in-set black and escaped colors.
    let (blacks, colored) = pixel_histogram(&session);
    assert!(blacks > 0 && colored > 0);
    assert_eq!(session.max_iterations(), 64, "reset restores the default cap");
    session.shutdown();
}

#[test]
fn pan_only_schedules_the_vacated_strip() {
    init_tracing();
    let mut session = RenderSession::new(small_config()).unwrap();
    wait_idle(&session);
    let (done_before, queued_before) = session.progress().counts();

    session.apply(Command::PanLeft).unwrap();
    wait_idle(&session);

    let (done_after, queued_after) = session.progress().counts();
    let full_frame = queued_before;
    let strip_tiles = queued_after - queued_before;
    assert!(
        strip_tiles < full_frame,
        "a quarter pan must schedule fewer tiles than a full frame \
         ({strip_tiles} vs {full_frame})"
    );
    assert_eq!(done_after - done_before, strip_tiles);
    session.shutdown();
}

#[test]
fn deep_precision_render_completes() {
    init_tracing();
    // Kept small: every pixel costs big-float iterations in this mode.
    let config = EngineConfig {
        canvas_width: 64,
        canvas_height: 36,
        max_iterations: 32,
        workers: Some(2),
        ..EngineConfig::default()
    };
    let mut session = RenderSession::new(config).unwrap();
    wait_idle(&session);

    session.apply(Command::TogglePrecision).unwrap();
    session.apply(Command::ZoomIn).unwrap();
    wait_idle(&session);

    let (blacks, colored) = pixel_histogram(&session);
    assert!(
        blacks > 0 && colored > 0,
        "arbitrary-precision frame must still paint both classes"
    );
    session.shutdown();
}

#[test]
fn quit_then_shutdown_joins_cleanly() {
    init_tracing();
    let mut session = RenderSession::new(small_config()).unwrap();
    assert_eq!(session.apply(Command::Quit).unwrap(), CommandOutcome::Quit);
    // Shutdown must return even with tiles still queued: the sentinels sit
    // behind them in FIFO order and every worker exits after its own.
    session.shutdown();
}

#[test]
fn precision_toggle_recommendation_appears_at_depth() {
    init_tracing();
    let mut session = RenderSession::new(small_config()).unwrap();
    assert!(!session.precision_toggle_recommended());

    // ~120 quarter-zooms shrink the view width by 0.75^120 ≈ 1e-15 of the
    // original — far past f64 pixel resolution.
    for _ in 0..120 {
        session.apply(Command::ZoomIn).unwrap();
    }
    assert!(session.precision_toggle_recommended());

    session.apply(Command::TogglePrecision).unwrap();
    assert!(
        !session.precision_toggle_recommended(),
        "already in arbitrary mode"
    );
    session.shutdown();
}
