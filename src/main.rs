// SPDX-License-Identifier: MIT
//
// hued — edit, preview, and export status bar color themes.
//
// This is the binary that wires the crates together:
//
//   hued-editor → workspace overrides, drafts, session, document loading
//   hued-render → bar layout and pixel output
//   hued-theme  → document model shared by both
//
// Every invocation loads the document, restores the session from its
// JSON file, runs one command through the Editor, and lets the Editor save
// the session again. A command flows like this:
//
//   document text → load_document → Editor (base + session)
//   command       → Editor operation → session file
//   render/export → PixelBuffer → PNG  |  resolved document → JSON
//
// Drafts never outlive a process: `edit` opens one, applies every change
// and confirms it (or drops it with --dry-run).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::warn;

use hued_color::{HexColor, HslShift};
use hued_editor::{Editor, EditorConfig, FileStore, Persistence};
use hued_render::{PixelBuffer, Surface};
use hued_theme::{RampSide, SwatchTarget, ThemeKind};

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "hued")]
#[command(about = "Edit, preview, and export status bar color themes")]
#[command(version)]
struct Cli {
    /// Theme document (JSON, comments and trailing commas allowed)
    document: PathBuf,

    /// Config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Session file, overriding the config
    #[arg(short, long, global = true)]
    session: Option<PathBuf>,

    /// Ramp length, overriding the config
    #[arg(long, global = true)]
    steps: Option<usize>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List themes and their bars
    List,

    /// Print a bar's colors
    Show { theme: String, bar: String },

    /// Render a bar to PNG
    Render(RenderArgs),

    /// Focus a theme, or one of its bars
    Select { theme: String, bar: Option<String> },

    /// Change a bar's colors and commit the result
    Edit(EditArgs),

    /// Theme operations
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// Bar operations
    #[command(subcommand)]
    Bar(BarCommand),

    /// Write the edited document as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Forget every edit made in this session
    Reset,
}

#[derive(Debug, Args)]
struct RenderArgs {
    theme: String,
    bar: String,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Fill level 0.0..=1.0; remembered for later renders
    #[arg(long)]
    fill: Option<f64>,

    /// Blend between bands; remembered for later renders
    #[arg(long)]
    smooth: Option<bool>,
}

#[derive(Debug, Args)]
struct EditArgs {
    theme: String,
    bar: String,

    /// Replace one swatch: `[left:|right:]INDEX=#RRGGBB`
    #[arg(long = "swatch", value_parser = parse_swatch)]
    swatches: Vec<SwatchEdit>,

    /// Hue shift in degrees
    #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
    hue: f64,

    /// Saturation shift in points
    #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
    saturation: f64,

    /// Lightness shift in points
    #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
    lightness: f64,

    /// Print the result without committing it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Subcommand)]
enum ThemeCommand {
    /// Create an empty theme
    Add {
        key: String,
        #[arg(long, value_enum, default_value_t = KindArg::Pc)]
        kind: KindArg,
        #[arg(long)]
        label: Option<String>,
    },
    /// Copy a theme, overwriting the target
    Copy { from: String, to: String },
    /// Rename a theme
    Rename { from: String, to: String },
    /// Delete a theme
    Delete { key: String },
    /// Set a theme's display label
    Label { key: String, label: String },
}

#[derive(Debug, Subcommand)]
enum BarCommand {
    /// Append an all-black bar
    Add { theme: String, bar: String },
    /// Duplicate a bar under a new name
    Copy { theme: String, from: String, to: String },
    /// Rename a bar in place
    Rename { theme: String, from: String, to: String },
    /// Delete a bar
    Delete { theme: String, bar: String },
    /// Swap a bar with the one DELTA places away
    Move {
        theme: String,
        bar: String,
        #[arg(allow_negative_numbers = true)]
        delta: isize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Pc,
    Ps1,
}

impl From<KindArg> for ThemeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Pc => Self::Pc,
            KindArg::Ps1 => Self::Ps1,
        }
    }
}

/// One `--swatch` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SwatchEdit {
    target: SwatchTarget,
    color: String,
}

fn parse_swatch(arg: &str) -> Result<SwatchEdit, String> {
    let (slot, color) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected [left:|right:]INDEX=COLOR, got {arg:?}"))?;
    let (side, index) = match slot.split_once(':') {
        Some(("left", index)) => (RampSide::Left, index),
        Some(("right", index)) => (RampSide::Right, index),
        Some((side, _)) => return Err(format!("unknown ramp side {side:?}")),
        None => (RampSide::Left, slot),
    };
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("bad swatch index {index:?}: {err}"))?;
    Ok(SwatchEdit {
        target: SwatchTarget::new(side, index),
        color: color.trim().to_string(),
    })
}

// ─── Setup ──────────────────────────────────────────────────────────────────

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<EditorConfig> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    if let Some(session) = &cli.session {
        config.session_path.clone_from(session);
    }
    if let Some(steps) = cli.steps {
        config.steps = steps;
    }
    config.validate()?;
    Ok(config)
}

fn open_editor(cli: &Cli) -> Result<Editor> {
    let config = load_config(cli)?;
    let store = FileStore::new(&config.session_path);
    let mut editor = Editor::new(config, Persistence::new(store));

    let text = fs::read_to_string(&cli.document)
        .with_context(|| format!("reading document {}", cli.document.display()))?;
    editor
        .load_document_text(&text)
        .with_context(|| format!("parsing document {}", cli.document.display()))?;
    Ok(editor)
}

// ─── Commands ───────────────────────────────────────────────────────────────

fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let mut editor = open_editor(cli)?;

    match &cli.command {
        Command::List => list(&editor, out)?,
        Command::Show { theme, bar } => {
            let text = editor
                .describe(theme, bar)
                .with_context(|| format!("no bar {theme}.{bar}"))?;
            writeln!(out, "{text}")?;
        }
        Command::Render(args) => render(&mut editor, args)?,
        Command::Select { theme, bar: Some(bar) } => {
            ensure!(has_bar(&editor, theme, bar), "no bar {theme}.{bar}");
            editor.select_bar(theme, bar);
        }
        Command::Select { theme, bar: None } => {
            ensure!(editor.select_theme(theme), "no theme {theme}");
        }
        Command::Edit(args) => edit(&mut editor, args, out)?,
        Command::Theme(cmd) => theme(&mut editor, cmd)?,
        Command::Bar(cmd) => bar(&mut editor, cmd)?,
        Command::Export { output } => {
            let json = editor.export_json()?;
            match output {
                Some(path) => fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display()))?,
                None => writeln!(out, "{json}")?,
            }
        }
        Command::Reset => {
            if !editor.reset_all() {
                writeln!(out, "nothing to reset")?;
            }
        }
    }

    if editor.is_persistence_degraded() {
        warn!(path = %editor.config().session_path.display(), "session was not saved");
    }
    Ok(())
}

fn has_bar(editor: &Editor, theme: &str, bar: &str) -> bool {
    editor.resolved().get(theme).is_some_and(|t| t.bars.contains_key(bar))
}

fn list(editor: &Editor, out: &mut impl Write) -> Result<()> {
    let resolved = editor.resolved();
    let selection = editor.selection();
    for (key, theme) in resolved.iter() {
        let label = theme.label.as_deref().map(|l| format!(" \"{l}\"")).unwrap_or_default();
        let edited = if editor.workspace().themes().contains_key(key) { " *" } else { "" };
        writeln!(out, "{key} ({}){label}{edited}", theme.kind())?;
        for bar in theme.bars.keys() {
            let marker = if selection.is_some_and(|s| s.theme == key && s.bar == bar) { '>' } else { ' ' };
            writeln!(out, "  {marker} {bar}")?;
        }
    }
    Ok(())
}

fn render(editor: &mut Editor, args: &RenderArgs) -> Result<()> {
    if let Some(fill) = args.fill {
        editor.set_percent(fill);
    }
    if let Some(smooth) = args.smooth {
        editor.set_smooth(smooth);
    }
    let width = args.width.unwrap_or(editor.config().preview_width);
    let height = args.height.unwrap_or(editor.config().preview_height);
    ensure!(width > 0 && height > 0, "image size must be non-zero");

    let buffer = editor
        .render(&args.theme, &args.bar, width, height)
        .with_context(|| format!("no bar {}.{}", args.theme, args.bar))?;
    write_png(&buffer, &args.output)
}

fn write_png(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    let Some(image) = image::RgbImage::from_raw(buffer.width(), buffer.height(), buffer.to_rgb_bytes()) else {
        bail!("pixel buffer does not match its size");
    };
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))
}

fn edit(editor: &mut Editor, args: &EditArgs, out: &mut impl Write) -> Result<()> {
    ensure!(has_bar(editor, &args.theme, &args.bar), "no bar {}.{}", args.theme, args.bar);
    editor.select_bar(&args.theme, &args.bar);

    // HSL first: it recomputes from the start snapshot, swatches then land
    // on top of the shifted ramp.
    let shift = HslShift::new(args.hue, args.saturation, args.lightness);
    if !shift.is_zero() {
        editor.edit_hsl(shift);
    }
    for swatch in &args.swatches {
        if HexColor::parse(&swatch.color).is_none() {
            warn!(color = %swatch.color, "not a hex color, writing black");
        }
        editor.edit_swatch(&args.theme, &args.bar, swatch.target, &swatch.color);
    }

    if let Some(text) = editor.describe(&args.theme, &args.bar) {
        writeln!(out, "{text}")?;
    }
    if args.dry_run {
        editor.cancel_draft();
    } else if editor.draft().is_some_and(hued_editor::Draft::is_dirty) {
        editor.confirm_draft()?;
    }
    Ok(())
}

fn theme(editor: &mut Editor, cmd: &ThemeCommand) -> Result<()> {
    match cmd {
        ThemeCommand::Add { key, kind, label } => {
            editor.add_theme(key, (*kind).into(), label.as_deref());
        }
        ThemeCommand::Copy { from, to } => {
            ensure!(editor.copy_theme(from, to), "no theme {from}");
        }
        ThemeCommand::Rename { from, to } => {
            ensure!(editor.rename_theme(from, to), "cannot rename {from} to {to}");
        }
        ThemeCommand::Delete { key } => {
            ensure!(editor.delete_theme(key), "no theme {key}");
        }
        ThemeCommand::Label { key, label } => {
            ensure!(editor.set_theme_label(key, label), "no theme {key}");
        }
    }
    Ok(())
}

fn bar(editor: &mut Editor, cmd: &BarCommand) -> Result<()> {
    match cmd {
        BarCommand::Add { theme, bar } => {
            ensure!(editor.add_bar(theme, bar), "cannot add {theme}.{bar}");
        }
        BarCommand::Copy { theme, from, to } => {
            ensure!(editor.copy_bar(theme, from, to), "cannot copy {theme}.{from} to {to}");
        }
        BarCommand::Rename { theme, from, to } => {
            ensure!(editor.rename_bar(theme, from, to), "cannot rename {theme}.{from} to {to}");
        }
        BarCommand::Delete { theme, bar } => {
            ensure!(editor.delete_bar(theme, bar), "no bar {theme}.{bar}");
        }
        BarCommand::Move { theme, bar, delta } => {
            ensure!(editor.move_bar(theme, bar, *delta), "cannot move {theme}.{bar} by {delta}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli, &mut io::stdout().lock())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r##"{
        "A": { "style": "pc", "colors": { "x": ["#ff0000", "#00ff00", "#0000ff", "#ffffff", "#000000"] } },
        // second
        "B": { "style": "ps1", "colors": {} },
    }"##;

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join("ui.json5"), DOC).unwrap();
            Self { dir }
        }

        fn run(&self, args: &[&str]) -> Result<String> {
            let doc = self.dir.path().join("ui.json5");
            let session = self.dir.path().join("session.json");
            let mut argv = vec![
                "hued".to_string(),
                doc.display().to_string(),
                "--session".to_string(),
                session.display().to_string(),
            ];
            argv.extend(args.iter().map(|a| (*a).to_string()));
            let cli = Cli::try_parse_from(argv)?;
            let mut out = Vec::new();
            run(&cli, &mut out)?;
            Ok(String::from_utf8(out)?)
        }
    }

    #[test]
    fn swatch_arguments() {
        assert_eq!(
            parse_swatch("2=#abcdef").unwrap(),
            SwatchEdit {
                target: SwatchTarget::pc(2),
                color: "#abcdef".into()
            }
        );
        assert_eq!(
            parse_swatch("right:0=#000").unwrap().target,
            SwatchTarget::new(RampSide::Right, 0)
        );
        assert!(parse_swatch("up:0=#000").is_err());
        assert!(parse_swatch("x=#000").is_err());
        assert!(parse_swatch("#000").is_err());
    }

    #[test]
    fn negative_move_parses() {
        let cli = Cli::try_parse_from(["hued", "doc", "bar", "move", "A", "x", "-1"]).unwrap();
        assert!(matches!(cli.command, Command::Bar(BarCommand::Move { delta: -1, .. })));
    }

    #[test]
    fn edits_persist_between_runs() {
        let fx = Fixture::new();
        fx.run(&["edit", "A", "x", "--swatch", "0=#123456"]).unwrap();
        let shown = fx.run(&["show", "A", "x"]).unwrap();
        assert_eq!(shown, "x\n#123456 #00ff00 #0000ff #ffffff #000000\n");
    }

    #[test]
    fn dry_run_leaves_no_trace() {
        let fx = Fixture::new();
        let printed = fx.run(&["edit", "A", "x", "--swatch", "4=#abcdef", "--dry-run"]).unwrap();
        assert!(printed.contains("#abcdef"));
        let shown = fx.run(&["show", "A", "x"]).unwrap();
        assert!(!shown.contains("#abcdef"));
    }

    #[test]
    fn theme_and_bar_commands() {
        let fx = Fixture::new();
        fx.run(&["theme", "add", "C", "--kind", "ps1"]).unwrap();
        fx.run(&["bar", "add", "C", "hp"]).unwrap();
        fx.run(&["theme", "delete", "B"]).unwrap();
        let listing = fx.run(&["list"]).unwrap();
        assert_eq!(listing, "A (pc)\n    x\nC (ps1) \"C\" *\n  > hp\n");
        assert!(fx.run(&["bar", "add", "C", "hp"]).is_err());
        assert!(fx.run(&["theme", "rename", "A", "C"]).is_err());
    }

    #[test]
    fn export_and_reset() {
        let fx = Fixture::new();
        fx.run(&["bar", "rename", "A", "x", "hp"]).unwrap();
        let json = fx.run(&["export"]).unwrap();
        assert!(json.contains("\"hp\""));
        assert!(!json.contains("\"x\""));
        assert_eq!(fx.run(&["reset"]).unwrap(), "");
        assert_eq!(fx.run(&["reset"]).unwrap(), "nothing to reset\n");
    }

    #[test]
    fn renders_png() {
        let fx = Fixture::new();
        let png = fx.dir.path().join("x.png");
        fx.run(&["render", "A", "x", "-o", png.to_str().unwrap(), "--width", "50", "--height", "10"])
            .unwrap();
        let img = image::open(&png).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 10));
        // Top-left pixel is the light border.
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn bad_document_is_reported() {
        let fx = Fixture::new();
        fs::write(fx.dir.path().join("ui.json5"), "{ nope").unwrap();
        let err = fx.run(&["list"]).unwrap_err();
        assert!(format!("{err:#}").contains("parsing document"));
    }
}
