use fractal_scanner::config::AppConfig;
use fractal_scanner::controllers::session::overlay::SessionState;
use fractal_scanner::core::data::complex::Complex;
use fractal_scanner::core::fractals::fractal_family::FractalFamily;
use fractal_scanner::presenters::file::image_codec::ImageFileCodec;
use fractal_scanner::storage::history::HistoryStore;
use fractal_scanner::{Command, CommandOutcome, SessionController, parse_step};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

const WAIT: Duration = Duration::from_secs(60);

const CONFIG: &str = r#"
[general]
default_quality = 0
max_history_states = 3

[fractal]
zoom_factor = 2.0

[[quality_presets.preset]]
name = "Thumbnail"
width = 40
height = 30

[iteration_presets]
default_index = 0

[[iteration_presets.preset]]
name = "Quick"
max_iterations = 64

[rendering]
refresh_every_n_lines = 3
"#;

fn new_session(dir: &Path) -> SessionController {
    let mut config = AppConfig::from_toml_str(CONFIG).unwrap();
    config.paths.export_directory = dir.join("exports").display().to_string();

    let history = HistoryStore::new(
        dir.join("history"),
        config.general.max_history_states,
        Box::new(ImageFileCodec::png()),
    )
    .unwrap();

    let mut session = SessionController::new(&config, history);
    session.dispatch(Command::SetDisplaySize { width: 40, height: 30 });
    session.dispatch(Command::MoveCursor { x: 20.0, y: 15.0 });
    session
}

fn run(session: &mut SessionController, step: &str) -> CommandOutcome {
    let outcome = session.dispatch(parse_step(step).unwrap());
    assert!(session.wait_until_idle(WAIT), "step '{step}' did not settle");
    outcome
}

fn history_files(dir: &Path) -> usize {
    fs::read_dir(dir.join("history")).unwrap().count()
}

#[test]
fn scripted_session_zooms_undoes_and_exports() {
    let dir = tempdir().unwrap();
    let mut session = new_session(dir.path());

    assert!(matches!(session.start(), CommandOutcome::Started { .. }));
    assert!(session.wait_until_idle(WAIT));

    assert!(matches!(run(&mut session, "zoom-in"), CommandOutcome::Started { .. }));
    assert_eq!(session.params().scale(), 1.5);

    assert_eq!(run(&mut session, "undo"), CommandOutcome::Applied);
    assert_eq!(session.params().scale(), 3.0);

    assert_eq!(run(&mut session, "export:final.ppm"), CommandOutcome::Applied);

    let exported = dir.path().join("exports").join("final.ppm");
    let bytes = fs::read(exported).unwrap();
    assert!(bytes.starts_with(b"P6"));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn history_is_bounded_and_truncated_on_new_branch() {
    let dir = tempdir().unwrap();
    let mut session = new_session(dir.path());
    session.start();
    assert!(session.wait_until_idle(WAIT));

    for _ in 0..4 {
        run(&mut session, "zoom-in");
    }
    assert_eq!(session.history().len(), 3);
    assert_eq!(history_files(dir.path()), 3);

    run(&mut session, "undo");
    run(&mut session, "undo");
    run(&mut session, "family:tricorn");

    assert_eq!(session.history().len(), 2);
    assert_eq!(history_files(dir.path()), 2);
    assert_eq!(run(&mut session, "redo"), CommandOutcome::NoOp);
    assert_eq!(session.params().family(), FractalFamily::Tricorn);
    assert_eq!(session.params().center(), Complex::ZERO);
}

#[test]
fn missing_history_image_leaves_state_unchanged() {
    let dir = tempdir().unwrap();
    let mut session = new_session(dir.path());
    session.start();
    assert!(session.wait_until_idle(WAIT));
    run(&mut session, "zoom-in");

    let first = session.history().entries()[0].image_path().to_path_buf();
    fs::remove_file(first).unwrap();

    assert_eq!(run(&mut session, "undo"), CommandOutcome::Failed);
    assert_eq!(session.params().scale(), 1.5);
    assert_eq!(session.history().cursor(), Some(1));
}

#[test]
fn every_family_renders_a_frame() {
    let dir = tempdir().unwrap();
    let mut session = new_session(dir.path());

    for family in FractalFamily::ALL {
        let outcome = session.dispatch(Command::SelectFamily(*family));
        assert!(matches!(outcome, CommandOutcome::Started { .. }));
        assert!(session.wait_until_idle(WAIT));

        let frame = session.frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (40, 30));
        assert_eq!(session.params().center(), family.seed_center());
    }
}
