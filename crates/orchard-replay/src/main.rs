//! Headless scenario runner.
//!
//! ```text
//! orchard-replay <scenario.json> [--tuning <tuning.json>] [--settings <settings.json>]
//!                [--transcript <out.json>]
//! ```
//!
//! Builds the scenario's level, plays its frames through a [`Session`] whose
//! collaborators log every call, and prints the final outcome. Set `RUST_LOG`
//! to change verbosity (default `info`).

mod host;
mod scenario;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use orchard_core::audio::AudioController;
use orchard_core::config::Tuning;
use orchard_core::session::Session;
use orchard_core::settings::{JsonSettingsStore, MemorySettingsStore, SettingsStore};
use orchard_core::sinks::Recorder;

use host::{ReplayHost, WaypointTriggers};
use scenario::{Action, Scenario};

const USAGE: &str = "usage: orchard-replay <scenario.json> [--tuning <tuning.json>] \
                     [--settings <settings.json>] [--transcript <out.json>]";

/// Command-line options.
#[derive(Debug, Clone, Default, PartialEq)]
struct Args {
    scenario: PathBuf,
    tuning: Option<PathBuf>,
    settings: Option<PathBuf>,
    transcript: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut scenario = None;
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--tuning" => &mut parsed.tuning,
                "--settings" => &mut parsed.settings,
                "--transcript" => &mut parsed.transcript,
                "-h" | "--help" => bail!("{USAGE}"),
                flag if flag.starts_with("--") => bail!("unknown option `{flag}`\n{USAGE}"),
                _ => {
                    if scenario.replace(PathBuf::from(&arg)).is_some() {
                        bail!("more than one scenario given\n{USAGE}");
                    }
                    continue;
                }
            };
            let Some(value) = args.next() else {
                bail!("`{arg}` needs a path\n{USAGE}");
            };
            *slot = Some(PathBuf::from(value));
        }
        let Some(scenario) = scenario else {
            bail!("no scenario given\n{USAGE}");
        };
        parsed.scenario = scenario;
        Ok(parsed)
    }
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        error!(error = %format!("{err:#}"), "replay failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

fn run() -> Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed to load tuning {}", path.display()))?,
        None => Tuning::default(),
    };
    let store: Box<dyn SettingsStore> = match &args.settings {
        Some(path) => Box::new(
            JsonSettingsStore::open(path)
                .with_context(|| format!("failed to open settings {}", path.display()))?,
        ),
        None => Box::new(MemorySettingsStore::new()),
    };
    let scenario = Scenario::load(&args.scenario)?;

    let recorder = args.transcript.as_ref().map(|_| Recorder::new());
    let host = ReplayHost::new(recorder.clone());
    let mut session = Session::new(tuning, scenario.layout)
        .with_audio(AudioController::new(Box::new(host.clone()), store))
        .with_presentation(Box::new(host.clone()))
        .with_physics(Box::new(host));

    info!(
        scenario = %args.scenario.display(),
        frames = scenario.frames.len(),
        entities = session.registry().len(),
        "replay started"
    );
    session.start();
    let mut triggers = WaypointTriggers::new(&session);

    for (index, frame) in scenario.frames.iter().enumerate() {
        for action in &frame.actions {
            apply_action(&mut session, *action);
            if matches!(action, Action::Restart) {
                triggers = WaypointTriggers::new(&session);
            }
        }
        let mut input = frame
            .to_input(&session)
            .with_context(|| format!("frame {index}"))?;
        input.waypoint_hits = triggers.entered(&session);
        session.tick(frame.dt, &input);
    }

    let summary = session.summary();
    info!(
        outcome = ?session.outcome(),
        items = summary.items,
        lives = summary.lives,
        frames = session.frame(),
        "replay finished"
    );
    println!(
        "outcome: {:?}\nitems: {}\nlives: {}",
        session.outcome(),
        summary.items,
        summary.lives
    );

    if let (Some(path), Some(recorder)) = (&args.transcript, recorder) {
        let json = serde_json::to_string_pretty(&recorder.calls())?;
        fs::write(path, json)
            .with_context(|| format!("failed to write transcript {}", path.display()))?;
        info!(path = %path.display(), "transcript written");
    }
    Ok(())
}

fn apply_action(session: &mut Session, action: Action) {
    match action {
        Action::OpenSettings => session.open_settings(),
        Action::CloseSettings => session.close_settings(),
        Action::Restart => session.restart_level(),
        Action::SwitchMusic => session.switch_music(),
        Action::MusicVolume(volume) => {
            if let Err(err) = session.set_music_volume(volume) {
                warn!(error = %err, "music volume not saved");
            }
        }
        Action::SoundVolume(volume) => {
            if let Err(err) = session.set_sound_volume(volume) {
                warn!(error = %err, "sound volume not saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(ToString::to_string))
    }

    #[test]
    fn parses_scenario_and_options() {
        let args = parse(&["run.json", "--tuning", "t.json", "--transcript", "out.json"]).unwrap();
        assert_eq!(args.scenario, PathBuf::from("run.json"));
        assert_eq!(args.tuning, Some(PathBuf::from("t.json")));
        assert_eq!(args.settings, None);
        assert_eq!(args.transcript, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn options_may_precede_the_scenario() {
        let args = parse(&["--settings", "s.json", "run.json"]).unwrap();
        assert_eq!(args.scenario, PathBuf::from("run.json"));
        assert_eq!(args.settings, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn rejects_bad_command_lines() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
        assert!(parse(&["a.json", "--tuning"]).is_err());
        assert!(parse(&["a.json", "--speed", "4"]).is_err());
    }
}
