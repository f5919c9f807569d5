use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use domino_planner::Planner;

use crate::output::{FileSink, Format};

mod menu;
mod output;

const DEFAULT_CONFIG: &str = "config.txt";

#[derive(Parser)]
struct Args {
    /// Geometry file of `key=value` lines. If not given, `config.txt` is
    /// used when it exists.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "domino_effect_gui_output.txt")]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Read commands from a file instead of prompting for them.
    #[arg(long)]
    script: Option<PathBuf>,
}

/// Reads the geometry file. Returns `None` when no file was named and the
/// default one doesn't exist.
fn read_config(
    path: Option<&Path>,
    read: impl FnOnce(&Path) -> io::Result<String>,
) -> anyhow::Result<Option<(&Path, String)>> {
    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG), false),
    };

    match read(path) {
        Ok(text) => Ok(Some((path, text))),
        Err(e) if !required && e.kind() == ErrorKind::NotFound => {
            log::info!("no {}, using the default geometry", path.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

fn load_config(planner: &mut Planner, path: Option<&Path>) -> anyhow::Result<()> {
    let Some((path, text)) = read_config(path, |p| std::fs::read_to_string(p))? else {
        return Ok(());
    };

    for err in planner.load_config(&text) {
        eprintln!("warning: {}: {err}", path.display());
    }
    log::debug!("geometry: {:?}", planner.geometry());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let mut planner = Planner::default();
    load_config(&mut planner, args.config.as_deref())?;

    let mut sink = FileSink {
        path: args.output,
        format: args.format,
    };

    if let Some(script) = &args.script {
        let text = std::fs::read_to_string(script)
            .with_context(|| format!("reading {}", script.display()))?;
        menu::run_script(&mut planner, &mut sink, &text)?;
    } else {
        menu::interactive(&mut planner, &mut sink)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(_: &Path) -> io::Result<String> {
        Err(io::Error::from(ErrorKind::NotFound))
    }

    #[test]
    fn default_config_is_optional() {
        assert!(read_config(None, missing).unwrap().is_none());

        let (path, text) = read_config(None, |p| {
            assert_eq!(p, Path::new(DEFAULT_CONFIG));
            Ok("wheel_radius=2".to_owned())
        })
        .unwrap()
        .unwrap();
        assert_eq!(path, Path::new(DEFAULT_CONFIG));
        assert_eq!(text, "wheel_radius=2");
    }

    #[test]
    fn named_config_is_required() {
        let err = read_config(Some(Path::new("rover.txt")), missing).unwrap_err();
        assert!(err.to_string().contains("rover.txt"));

        let denied = read_config(None, |_| Err(io::Error::from(ErrorKind::PermissionDenied)));
        assert!(denied.is_err());
    }

    #[test]
    fn loaded_config_reaches_the_planner() {
        let mut planner = Planner::default();
        planner.append(domino_planner::MoveKind::StraightForward, 1, -1.0);
        let (_, text) = read_config(None, |_| Ok("wheel_radius=3\n".to_owned()))
            .unwrap()
            .unwrap();
        assert!(planner.load_config(&text).is_empty());
        assert_eq!(planner.geometry().wheel_radius().get(), 3.0);
        assert_eq!(planner.count(), 0);
    }
}
