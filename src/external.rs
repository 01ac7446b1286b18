use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use serde::Deserialize;

use crate::stage::Command;

/// One line of the external control feed, e.g. `{"command":"play"}` or
/// `{"command":"speed","value":1.5}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ControlCommand {
    Play,
    Pause,
    Toggle,
    Reset,
    Speed { value: f64 },
    Faster,
    Slower,
    Next,
    Previous,
    Activate { pattern: String },
}

impl From<ControlCommand> for Command {
    fn from(c: ControlCommand) -> Self {
        match c {
            ControlCommand::Play => Command::Play,
            ControlCommand::Pause => Command::Pause,
            ControlCommand::Toggle => Command::Toggle,
            ControlCommand::Reset => Command::Reset,
            ControlCommand::Speed { value } => Command::Speed(value),
            ControlCommand::Faster => Command::Faster,
            ControlCommand::Slower => Command::Slower,
            ControlCommand::Next => Command::NextPattern,
            ControlCommand::Previous => Command::PreviousPattern,
            ControlCommand::Activate { pattern } => Command::Activate(pattern),
        }
    }
}

/// Parses one line; blank and malformed lines yield `None`.
pub fn parse_line(line: &str) -> Option<ControlCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(command) => Some(command),
        Err(e) => {
            tracing::warn!(line, error = %e, "ignoring control line");
            None
        }
    }
}

/// Last non-empty line of a control file.
fn last_command(path: &Path) -> Option<ControlCommand> {
    let contents = std::fs::read_to_string(path).ok()?;
    let line = contents.lines().rfind(|l| !l.trim().is_empty())?;
    parse_line(line)
}

pub enum ControlSource {
    Stdin,
    File(PathBuf),
}

impl ControlSource {
    /// `-` selects stdin, anything else a watched file.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            ControlSource::Stdin
        } else {
            ControlSource::File(PathBuf::from(arg))
        }
    }
}

/// Reads commands on a background thread. The receiver is drained by the
/// UI loop; the thread ends once the receiver is dropped.
pub fn spawn_reader(source: ControlSource) -> Receiver<ControlCommand> {
    let (tx, rx) = mpsc::channel::<ControlCommand>();
    match source {
        ControlSource::Stdin => {
            std::thread::spawn(move || read_stdin(tx));
        }
        ControlSource::File(path) => {
            std::thread::spawn(move || watch_file(&path, tx));
        }
    }
    rx
}

fn read_stdin(tx: Sender<ControlCommand>) {
    let stdin = std::io::BufReader::new(std::io::stdin());
    for line in stdin.lines() {
        let Ok(line) = line else { break };
        if let Some(command) = parse_line(&line)
            && tx.send(command).is_err()
        {
            break;
        }
    }
}

fn watch_file(path: &Path, tx: Sender<ControlCommand>) {
    // Apply whatever the file already holds
    if let Some(command) = last_command(path)
        && tx.send(command).is_err()
    {
        return;
    }

    let (file_tx, file_rx) = mpsc::channel();
    let mut watcher = match notify::recommended_watcher(move |res| {
        let _ = file_tx.send(res);
    }) {
        Ok(w) => w,
        Err(e) => {
            tracing::warn!(error = %e, "cannot create file watcher");
            return;
        }
    };
    if let Err(e) = notify::Watcher::watch(&mut watcher, path, notify::RecursiveMode::NonRecursive) {
        tracing::warn!(path = %path.display(), error = %e, "cannot watch control file");
        return;
    }
    tracing::debug!(path = %path.display(), "watching control file");

    while let Ok(Ok(_event)) = file_rx.recv() {
        if let Some(command) = last_command(path)
            && tx.send(command).is_err()
        {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_each_command() {
        assert_eq!(parse_line(r#"{"command":"play"}"#), Some(ControlCommand::Play));
        assert_eq!(
            parse_line(r#" {"command":"speed","value":1.5} "#),
            Some(ControlCommand::Speed { value: 1.5 })
        );
        assert_eq!(
            parse_line(r#"{"command":"activate","pattern":"pattern-9-two-heaps"}"#),
            Some(ControlCommand::Activate {
                pattern: "pattern-9-two-heaps".into()
            })
        );
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("play"), None);
        assert_eq!(parse_line(r#"{"command":"explode"}"#), None);
        assert_eq!(parse_line(r#"{"command":"speed"}"#), None);
    }

    #[test]
    fn test_maps_onto_stage_commands() {
        assert_eq!(Command::from(ControlCommand::Next), Command::NextPattern);
        assert_eq!(Command::from(ControlCommand::Speed { value: 0.7 }), Command::Speed(0.7));
    }

    #[test]
    fn test_file_source_applies_last_line() {
        let path = std::env::temp_dir().join(format!("patternflix-control-{}.jsonl", std::process::id()));
        std::fs::write(&path, "{\"command\":\"play\"}\n{\"command\":\"reset\"}\n\n").unwrap();
        assert_eq!(last_command(&path), Some(ControlCommand::Reset));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(last_command(&path), None);
    }

    #[test]
    fn test_dash_selects_stdin() {
        assert!(matches!(ControlSource::from_arg("-"), ControlSource::Stdin));
        assert!(matches!(ControlSource::from_arg("ctl.jsonl"), ControlSource::File(_)));
    }
}
