use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use montage::{
    CpuMediaBackend, DirStore, Editor, EditorConfig, ExportFormat, MediaBlob, RasterRenderer,
    Snapshot, SystemFontLoader, TextBoxOptions,
};

#[derive(Parser, Debug)]
#[command(name = "montage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a scene from media files and text, and store it as a snapshot.
    Compose(ComposeArgs),
    /// Flatten a snapshot into a PNG or JPEG.
    Export(ExportArgs),
    /// List the objects of a snapshot.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image or video file to import (repeatable).
    #[arg(long)]
    media: Vec<PathBuf>,

    /// Text box to add (repeatable).
    #[arg(long)]
    text: Vec<String>,

    /// Fill color for added text boxes.
    #[arg(long)]
    fill: Option<String>,

    /// Make added text boxes bold.
    #[arg(long, default_value_t = false)]
    bold: bool,

    /// Font family for added text boxes.
    #[arg(long)]
    font: Option<String>,

    /// Extra directory of .ttf/.otf/.ttc files.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Snapshot directory (one `<slot>.json` per slot).
    #[arg(long)]
    store: PathBuf,

    /// Slot name (defaults to the config's snapshot slot).
    #[arg(long)]
    slot: Option<String>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// `png` or `jpeg` (defaults to the output extension, then png).
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Extra directory of .ttf/.otf/.ttc files.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Export(args) => cmd_export(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => EditorConfig::from_path(path)?,
        None => EditorConfig::default(),
    };
    if let Some(slot) = args.slot {
        config.snapshot_slot = slot;
    }

    let mut editor = Editor::new(config).context("invalid editor config")?;
    let backend = CpuMediaBackend;
    for path in &args.media {
        let blob = MediaBlob::from_path(path)?;
        let id = pollster::block_on(editor.import_media(&backend, blob))
            .with_context(|| format!("import '{}'", path.display()))?;
        eprintln!("imported {} as {id}", path.display());
    }

    let fonts = if args.font.is_some() {
        Some(SystemFontLoader::new(&args.font_dirs))
    } else {
        None
    };
    for text in &args.text {
        editor.add_text(Some(text), TextBoxOptions::default());
        if let Some(fill) = &args.fill {
            editor.set_fill_color(fill)?;
        }
        if args.bold {
            editor.set_font_weight(true)?;
        }
        if let (Some(family), Some(loader)) = (&args.font, &fonts) {
            pollster::block_on(editor.set_font_family(loader, family))?;
        }
    }

    let mut store = DirStore::new(&args.store);
    editor.dump_to(&mut store)?;
    eprintln!(
        "stored {} object(s) in {}",
        editor.scene().len(),
        store
            .dir()
            .join(format!("{}.json", editor.config().snapshot_slot))
            .display()
    );
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&args.in_path)?;
    let mut editor = Editor::default();
    editor.restore(&snapshot)?;

    let format = args
        .format
        .or_else(|| ExportFormat::from_path(&args.out))
        .unwrap_or_default();
    let renderer = RasterRenderer::with_fonts(&SystemFontLoader::new(&args.font_dirs));
    let bytes = editor.export_image(&renderer, format)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&args.in_path)?;
    let scene = montage::restore(&snapshot)?;
    let canvas = scene.canvas();
    println!(
        "canvas {}x{} background {}",
        canvas.width, canvas.height, canvas.background
    );
    for (idx, (id, obj)) in scene.objects().enumerate() {
        let t = &obj.transform;
        let mut line = format!(
            "{idx:>3} {:<5} {:<5} at ({}, {}) size {}x{}",
            id.to_string(),
            obj.kind().to_string(),
            t.left,
            t.top,
            t.width,
            t.height
        );
        if let Some(text) = obj.as_text() {
            line.push_str(&format!(
                " \"{}\" {} {}px {} {}",
                text.text.replace('\n', "\\n"),
                text.font_family,
                text.font_size,
                text.fill,
                text.font_weight.as_css()
            ));
        }
        println!("{line}");
    }
    Ok(())
}

fn read_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read snapshot '{}'", path.display()))?;
    Ok(Snapshot::from_json(&text)?)
}
