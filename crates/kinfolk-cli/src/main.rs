use chrono::NaiveDate;
use kinfolk_core::{DisplaySettings, Expansion, LayoutConfig, Orientation, Snapshot, ViewConfig};
use kinfolk_layout::{LayoutOptions, generations_of, layout_tree, list_view};
use serde::Serialize;
use std::io::{Read, Write};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Kinfolk(kinfolk_core::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Kinfolk(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<kinfolk_core::Error> for CliError {
    fn from(value: kinfolk_core::Error) -> Self {
        Self::Kinfolk(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Generations,
    List,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    configs: Vec<String>,
    overrides: Vec<String>,
    pretty: bool,
    interactive: bool,
    no_sibling_edges: bool,
    orientation: Option<Orientation>,
    levels_up: Option<u32>,
    levels_down: Option<u32>,
    expansion: Expansion,
    today: Option<NaiveDate>,
}

fn usage() -> &'static str {
    "kinfolk-cli\n\
\n\
USAGE:\n\
  kinfolk-cli [layout] [OPTIONS] [<path>|-]\n\
  kinfolk-cli generations [--pretty] [<path>|-]\n\
  kinfolk-cli list [OPTIONS] [<path>|-]\n\
\n\
OPTIONS:\n\
  --orientation tb|bt     stack generations top-down (default) or bottom-up\n\
  --expand-up             show every ancestor generation\n\
  --expand-down           show every descendant generation\n\
  --levels-up <n>         ancestor generations shown when collapsed (default 3)\n\
  --levels-down <n>       descendant generations shown when collapsed (default 3)\n\
  --no-sibling-edges      omit sibling edges\n\
  --interactive           interactive-view preset (no sibling edges)\n\
  --config <path>         JSON view config (`tree.*`, `display.*` keys); repeatable\n\
  --set <key>=<value>     override one view config key, e.g. tree.levelsUp=2; repeatable\n\
  --today <YYYY-MM-DD>    reference date for member ages\n\
  --pretty                pretty-print JSON output\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the snapshot is read from stdin.\n\
  - A snapshot is `{\"members\": [...]}` with joined relationship arrays, the same plus a flat\n\
    `\"relationships\"` list, or a bare member array.\n\
  - Later --config files are merged over earlier ones, --set values over all files, and the\n\
    other flags override both.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or_else(|| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "generations" => args.command = Command::Generations,
            "list" => args.command = Command::List,
            "--pretty" => args.pretty = true,
            "--interactive" => args.interactive = true,
            "--no-sibling-edges" => args.no_sibling_edges = true,
            "--expand-up" => args.expansion.up = true,
            "--expand-down" => args.expansion.down = true,
            "--orientation" => {
                let raw = next_value(&mut it)?;
                args.orientation = Some(
                    raw.parse::<Orientation>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--levels-up" => {
                let raw = next_value(&mut it)?;
                args.levels_up = Some(raw.parse::<u32>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--levels-down" => {
                let raw = next_value(&mut it)?;
                args.levels_down =
                    Some(raw.parse::<u32>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--config" => args.configs.push(next_value(&mut it)?.clone()),
            "--set" => args.overrides.push(next_value(&mut it)?.clone()),
            "--today" => {
                let raw = next_value(&mut it)?;
                args.today = Some(
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn view_config(args: &Args) -> Result<ViewConfig, CliError> {
    let mut view = ViewConfig::empty_object();
    for path in &args.configs {
        view.merge(&ViewConfig::from_json(&std::fs::read_to_string(path)?)?);
        tracing::debug!(path = %path, "merged view config");
    }
    for assignment in &args.overrides {
        view.apply_override(assignment)?;
    }
    Ok(view)
}

/// Preset, then the merged view config, then flags.
fn build_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let preset = if args.interactive {
        LayoutConfig::interactive()
    } else {
        LayoutConfig::default()
    };
    let view = view_config(args)?;
    let mut config = preset.with_view_config(&view)?;
    let display = DisplaySettings::from_view_config(&view)?;

    if let Some(o) = args.orientation {
        config.orientation = o;
    }
    if let Some(n) = args.levels_up {
        config.levels_up = n;
    }
    if let Some(n) = args.levels_down {
        config.levels_down = n;
    }
    if args.no_sibling_edges {
        config.include_sibling_edges = false;
    }

    Ok(LayoutOptions {
        config,
        expansion: args.expansion,
        display,
        today: args.today,
    })
}

fn run(args: Args) -> Result<(), CliError> {
    let options = build_options(&args)?;
    let text = read_input(args.input.as_deref())?;
    let snapshot = Snapshot::from_json(&text)?;
    tracing::debug!(members = snapshot.len(), command = ?args.command, "loaded snapshot");

    match args.command {
        Command::Layout => write_json(&layout_tree(&snapshot, &options), args.pretty),
        Command::Generations => write_json(&generations_of(&snapshot), args.pretty),
        Command::List => write_json(
            &list_view(&snapshot, options.expansion, &options.config),
            args.pretty,
        ),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        std::iter::once("kinfolk-cli")
            .chain(items.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn flags_override_preset() {
        let args = parse_args(&argv(&[
            "list",
            "--interactive",
            "--orientation",
            "bt",
            "--levels-up",
            "1",
            "--expand-down",
            "tree.json",
        ]))
        .unwrap();
        assert!(matches!(args.command, Command::List));
        assert_eq!(args.input.as_deref(), Some("tree.json"));

        let options = build_options(&args).unwrap();
        assert!(!options.config.include_sibling_edges);
        assert_eq!(options.config.orientation, Orientation::BT);
        assert_eq!(options.config.levels_up, 1);
        assert_eq!(options.config.levels_down, 3);
        assert_eq!(options.expansion, Expansion { up: false, down: true });
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            parse_args(&argv(&["--levels-up", "-1"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["--orientation", "sideways"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["--today", "15/06/2020"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["a.json", "b.json"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(parse_args(&argv(&["--today"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&argv(&["--set"])), Err(CliError::Usage(_))));
    }

    #[test]
    fn set_overrides_apply_over_the_preset() {
        let args = parse_args(&argv(&[
            "--interactive",
            "--set",
            "tree.levelsDown=1",
            "--set",
            "display.showLocation=false",
            "--set",
            "tree.orientation=BT",
        ]))
        .unwrap();
        let options = build_options(&args).unwrap();
        assert!(!options.config.include_sibling_edges);
        assert_eq!(options.config.levels_down, 1);
        assert_eq!(options.config.orientation, Orientation::BT);
        assert!(!options.display.show_location);
        assert!(options.display.show_dob);

        let args = parse_args(&argv(&["--set", "tree.levelsUp"])).unwrap();
        assert!(matches!(
            build_options(&args),
            Err(CliError::Kinfolk(kinfolk_core::Error::InvalidConfig { .. }))
        ));
    }
}
