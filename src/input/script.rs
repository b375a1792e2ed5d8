//! Textual commands for driving a session from the command line.
//!
//! A step is a keyword optionally followed by `:` and an argument, e.g.
//! `zoom-in`, `cursor:640,360`, `family:burning-ship` or `export:shot.png`.
//! A bare `export` writes a timestamped file to the export directory.

use crate::controllers::session::command::Command;
use crate::core::fractals::fractal_family::{FractalFamily, ParseFractalFamilyError};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("unknown step '{0}'")]
    UnknownStep(String),

    #[error("step '{step}' needs an argument")]
    MissingArgument { step: String },

    #[error("step '{step}' takes no argument")]
    UnexpectedArgument { step: String },

    #[error("invalid argument '{argument}' for step '{step}'")]
    InvalidArgument { step: String, argument: String },

    #[error(transparent)]
    Family(#[from] ParseFractalFamilyError),
}

pub fn parse_step(step: &str) -> Result<Command, ScriptError> {
    let step = step.trim();
    let (name, argument) = match step.split_once(':') {
        Some((name, argument)) => (name.trim(), Some(argument.trim())),
        None => (step, None),
    };
    let name = name.to_ascii_lowercase();

    let command = match (name.as_str(), argument) {
        ("zoom-in", None) => Command::ZoomInAtCursor,
        ("zoom-out", None) => Command::ZoomOutAtCursor,
        ("reset", None) => Command::ResetView,
        ("regenerate", None) => Command::Regenerate,
        ("pause", None) => Command::TogglePause,
        ("cancel", None) => Command::Cancel,
        ("undo", None) => Command::Undo,
        ("redo", None) => Command::Redo,
        ("overlay", None) => Command::ToggleOverlay,
        ("fullscreen", None) => Command::ToggleFullscreen,

        ("family", Some(arg)) => Command::SelectFamily(arg.parse::<FractalFamily>()?),
        ("quality", Some(arg)) => Command::SetQuality(number(&name, arg)?),
        ("iterations", Some(arg)) => Command::SetIterations(number(&name, arg)?),
        ("cursor", Some(arg)) => {
            let (x, y) = pair(&name, arg)?;
            Command::MoveCursor { x, y }
        }
        ("pan", Some(arg)) => {
            let (dx, dy) = pair(&name, arg)?;
            Command::PanView { dx, dy }
        }
        ("view-zoom", Some(arg)) => Command::ZoomView(number(&name, arg)?),
        // Without a path the session picks a timestamped name.
        ("export", arg) => Command::Export(PathBuf::from(arg.unwrap_or_default())),

        (
            "zoom-in" | "zoom-out" | "reset" | "regenerate" | "pause" | "cancel" | "undo" | "redo"
            | "overlay" | "fullscreen",
            Some(_),
        ) => return Err(ScriptError::UnexpectedArgument { step: name }),
        ("family" | "quality" | "iterations" | "cursor" | "pan" | "view-zoom", _) => {
            return Err(ScriptError::MissingArgument { step: name });
        }
        _ => return Err(ScriptError::UnknownStep(step.to_string())),
    };

    Ok(command)
}

fn number<T: FromStr>(step: &str, argument: &str) -> Result<T, ScriptError> {
    argument.parse().map_err(|_| invalid(step, argument))
}

fn pair(step: &str, argument: &str) -> Result<(f64, f64), ScriptError> {
    let (a, b) = argument
        .split_once(',')
        .ok_or_else(|| invalid(step, argument))?;

    Ok((number(step, a.trim())?, number(step, b.trim())?))
}

fn invalid(step: &str, argument: &str) -> ScriptError {
    ScriptError::InvalidArgument {
        step: step.to_string(),
        argument: argument.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_steps() {
        assert_eq!(parse_step("zoom-in"), Ok(Command::ZoomInAtCursor));
        assert_eq!(parse_step(" Undo "), Ok(Command::Undo));
        assert_eq!(parse_step("pause"), Ok(Command::TogglePause));
    }

    #[test]
    fn parses_steps_with_arguments() {
        assert_eq!(
            parse_step("cursor:640, 360.5"),
            Ok(Command::MoveCursor { x: 640.0, y: 360.5 })
        );
        assert_eq!(
            parse_step("family:burning-ship"),
            Ok(Command::SelectFamily(FractalFamily::BurningShip))
        );
        assert_eq!(parse_step("quality:3"), Ok(Command::SetQuality(3)));
        assert_eq!(parse_step("view-zoom:1.5"), Ok(Command::ZoomView(1.5)));
        assert_eq!(
            parse_step("export:out/shot.ppm"),
            Ok(Command::Export(PathBuf::from("out/shot.ppm")))
        );
    }

    #[test]
    fn rejects_malformed_steps() {
        assert_eq!(
            parse_step("warp"),
            Err(ScriptError::UnknownStep("warp".to_string()))
        );
        assert_eq!(
            parse_step("quality"),
            Err(ScriptError::MissingArgument {
                step: "quality".to_string()
            })
        );
        assert_eq!(
            parse_step("undo:2"),
            Err(ScriptError::UnexpectedArgument {
                step: "undo".to_string()
            })
        );
        assert_eq!(
            parse_step("cursor:12"),
            Err(ScriptError::InvalidArgument {
                step: "cursor".to_string(),
                argument: "12".to_string()
            })
        );
        assert!(matches!(parse_step("family:koch"), Err(ScriptError::Family(_))));
        assert_eq!(parse_step("export"), Ok(Command::Export(PathBuf::new())));
    }
}
