//! Rider Rush entry point
//!
//! Native builds run a scripted demo ride against the headless backend at the
//! configured refresh rate, logging the HUD once per second. Browser hosts
//! drive `Session::frame` from their own animation loop instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::path::Path;
    use std::process::ExitCode;

    use rider_rush::assets::ModelLibrary;
    use rider_rush::renderer::HeadlessBackend;
    use rider_rush::scene::NodeIds;
    use rider_rush::{FrameOutcome, Session, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rider Rush (native) starting...");

    let settings = Settings::load(Path::new("settings.json"));
    let mut ids = NodeIds::new();
    let library = ModelLibrary::placeholder(&mut ids);

    let mut session = match Session::new(&settings, library, HeadlessBackend::default()) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    let frame_ms = 1000.0 / settings.refresh_hz;
    let hz = settings.refresh_hz.round().max(1.0) as u64;

    for frame in 0..settings.demo_frames {
        let now = frame as f64 * frame_ms;

        for (key, pressed) in demo_keys(frame, hz) {
            session.key_event(key, pressed);
        }
        if session.hud().prompt.interactive {
            session.press_restart(now);
        }

        if session.frame(now) == FrameOutcome::ReloadRequested {
            log::info!(
                "Ride over after {} frames, {:.0} m down the road",
                frame + 1,
                -session.state().bike.position.z
            );
            return ExitCode::SUCCESS;
        }

        if frame % hz == 0 {
            log::info!("[{:>4}s] {}", frame / hz, session.hud().status);
        }
    }

    log::info!("Demo ride ended after {} frames", settings.demo_frames);
    ExitCode::SUCCESS
}

/// Key edges for the scripted ride: full throttle from the start, then an
/// eight-second loop of weaving across the road with a wheelie in between.
#[cfg(not(target_arch = "wasm32"))]
fn demo_keys(frame: u64, hz: u64) -> Vec<(&'static str, bool)> {
    if frame == 0 {
        return vec![("ArrowUp", true)];
    }
    if frame % hz != 0 {
        return Vec::new();
    }
    match (frame / hz) % 8 {
        1 => vec![("a", true)],
        2 => vec![("a", false), (" ", true)],
        3 => vec![(" ", false)],
        5 => vec![("d", true)],
        6 => vec![("d", false)],
        _ => Vec::new(),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
