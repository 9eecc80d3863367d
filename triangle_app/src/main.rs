//! Triangle demo application
//!
//! Opens a window (or takes over the framebuffer), creates an OpenGL ES 2
//! context through EGL and redraws a colored triangle at a fixed frame rate
//! until the window is closed or the process receives SIGINT/SIGTERM.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use gles_engine::prelude::*;
use std::ffi::OsString;
use std::process::ExitCode;

fn cli() -> Command {
    Command::new("triangle")
        .about("Draws a colored triangle with OpenGL ES 2 through EGL")
        .arg(
            Arg::new("info")
                .long("info")
                .help("Display OpenGL renderer info")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Load settings from a .toml or .ron file"),
        )
        .arg(
            Arg::new("fps")
                .long("fps")
                .value_name("FRAMES")
                .help("Frames per second (default 24)")
                .value_parser(value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("framebuffer")
                .long("framebuffer")
                .help("Render straight to the framebuffer instead of an X11 window")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

/// Accept single-dash long flags such as `-info`
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-info") => OsString::from("--info"),
            Some("-framebuffer") => OsString::from("--framebuffer"),
            _ => arg,
        })
        .collect()
}

fn build_config(matches: &ArgMatches) -> Result<DemoConfig, ConfigError> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            DemoConfig::load_from_file(path)?
        }
        None => DemoConfig::default(),
    };

    if let Some(&fps) = matches.get_one::<u32>("fps") {
        config.render.frames_per_second = fps;
    }
    if matches.get_flag("framebuffer") {
        config.window.target = TargetKind::Framebuffer;
    }
    Ok(config)
}

/// Log panics, then hand them to the previous hook so they still reach stderr
/// before the logger is up
fn chain_logging_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        log::error!("{}", panic_info);
        previous(panic_info);
    }));
}

fn main() -> ExitCode {
    // GL errors panic on the render thread
    chain_logging_hook();

    let matches = cli().get_matches_from(normalize_args(std::env::args_os()));

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    gles_engine::foundation::logging::init(level);

    let config = match build_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = RunOptions {
        print_info: matches.get_flag("info"),
    };

    let result = Engine::new(config, options).and_then(Engine::run);
    match result {
        Ok(stats) => {
            log::info!("Rendered {} frames ({:.1} fps average)", stats.frames, stats.average_fps);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn matches(args: &[&str]) -> ArgMatches {
        let args = normalize_args(args.iter().map(OsString::from));
        cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn test_single_dash_info() {
        assert!(matches(&["triangle", "-info"]).get_flag("info"));
        assert!(matches(&["triangle", "--info"]).get_flag("info"));
        assert!(!matches(&["triangle"]).get_flag("info"));
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = build_config(&matches(&["triangle"])).unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_fps_and_framebuffer_override() {
        let config = build_config(&matches(&["triangle", "--fps", "60", "-framebuffer"])).unwrap();
        assert_eq!(config.render.frames_per_second, 60);
        assert_eq!(config.window.target, TargetKind::Framebuffer);
    }

    #[test]
    fn test_zero_fps_rejected() {
        let args = normalize_args(["triangle", "--fps", "0"].iter().map(OsString::from));
        assert!(cli().try_get_matches_from(args).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let args = ["triangle", "--config", "/nonexistent/triangle.toml"];
        let result = build_config(&matches(&args));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_panic_hook_keeps_previous_hook() {
        static PREVIOUS_CALLED: AtomicBool = AtomicBool::new(false);

        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| PREVIOUS_CALLED.store(true, Ordering::SeqCst)));
        chain_logging_hook();

        let result = std::panic::catch_unwind(|| panic!("render thread failed"));

        drop(std::panic::take_hook());
        std::panic::set_hook(original);

        assert!(result.is_err());
        assert!(PREVIOUS_CALLED.load(Ordering::SeqCst));
    }

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }
}
