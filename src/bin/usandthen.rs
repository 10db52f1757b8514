use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "usandthen", version)]
struct Cli {
    /// Config JSON (print format, spread typography, font path).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Font file; overrides the config and `USANDTHEN_FONT_PATH`.
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out page JSON (one page or an array) and print the layout JSON.
    Layout(LayoutArgs),
    /// Composite a two-panel spread PNG from a character image and narration.
    Spread(SpreadArgs),
    /// Rasterise a layout JSON as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Book id used to seed jitter.
    #[arg(long, default_value = "book")]
    book: String,

    /// Page number for pages that carry none.
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Force a layout mode.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Write JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SpreadArgs {
    /// Character image file or data URL.
    #[arg(long)]
    image: String,

    /// Narration text.
    #[arg(long)]
    narration: String,

    /// Side of the spread holding the character.
    #[arg(long, value_enum, default_value_t = PositionChoice::Left)]
    position: PositionChoice,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write an inpaint mask protecting the text.
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Padding around the text in the mask.
    #[arg(long, default_value_t = 24.0)]
    mask_padding: f64,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input layout JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output scale relative to the print canvas.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// Renderer to use.
    #[arg(long, value_enum, default_value_t = RendererChoice::Auto)]
    renderer: RendererChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Image70,
    Text70,
    FullBleed,
    Closeup,
    Spread,
}

impl From<ModeChoice> for usandthen::LayoutMode {
    fn from(m: ModeChoice) -> Self {
        match m {
            ModeChoice::Image70 => usandthen::LayoutMode::Image70,
            ModeChoice::Text70 => usandthen::LayoutMode::Text70,
            ModeChoice::FullBleed => usandthen::LayoutMode::FullBleed,
            ModeChoice::Closeup => usandthen::LayoutMode::Closeup,
            ModeChoice::Spread => usandthen::LayoutMode::Spread,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PositionChoice {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RendererChoice {
    Auto,
    Vello,
    Basic,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = usandthen::Config::load(cli.config.as_deref())?;
    if let Some(font) = cli.font {
        config.font_path = Some(font);
    }

    match cli.cmd {
        Command::Layout(args) => cmd_layout(&config, args),
        Command::Spread(args) => cmd_spread(&config, args),
        Command::Render(args) => cmd_render(&config, args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse JSON '{}'", path.display()))
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            ensure_parent(path)?;
            std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("write stdout")?;
        }
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_layout(config: &usandthen::Config, args: LayoutArgs) -> anyhow::Result<()> {
    let value = read_json(&args.in_path)?;
    let pages = usandthen::PageContent::many_from_value(&value);
    if pages.is_empty() {
        anyhow::bail!("'{}' holds no page objects", args.in_path.display());
    }

    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let requests: Vec<usandthen::PageRequest> = pages
        .iter()
        .map(|p| {
            let mut req = p.to_request(&args.book, args.page);
            req.mode_override = args.mode.map(Into::into);
            if req.image_aspect.is_none() {
                req.image_aspect = illustration_aspect(req.illustration_url.as_deref(), root);
            }
            req
        })
        .collect();

    let engine = usandthen::LayoutEngine::new(config.format)?;
    let json = if let [single] = requests.as_slice() {
        serde_json::to_string_pretty(&engine.generate(single))?
    } else {
        let book = usandthen::BookLayouts::generate_all(&engine, &requests);
        serde_json::to_string_pretty(&book)?
    };
    write_output(args.out.as_deref(), &json)
}

// Aspect ratio from a locally resolvable illustration; remote URLs stay unknown.
fn illustration_aspect(url: Option<&str>, root: &Path) -> Option<f64> {
    let url = url?;
    let store = usandthen::ImageStore::prepare([url], root);
    store.get(url).map(usandthen::PreparedImage::aspect_ratio)
}

fn cmd_spread(config: &usandthen::Config, args: SpreadArgs) -> anyhow::Result<()> {
    let character_image = if args.image.trim_start().starts_with("data:") {
        usandthen::CharacterImage::DataUrl(args.image.clone())
    } else {
        let bytes = std::fs::read(&args.image)
            .with_context(|| format!("read character image '{}'", args.image))?;
        let img = image::load_from_memory(&bytes)
            .with_context(|| format!("decode character image '{}'", args.image))?;
        usandthen::CharacterImage::Decoded(img.to_rgba8())
    };

    let mut compositor =
        usandthen::SpreadCompositor::new(&config.format, config.typography.clone())?;
    if let Some(font) = config.load_font()? {
        compositor = compositor.with_font(font);
    }

    let result = compositor.compose(&usandthen::SpreadInput {
        character_image,
        narration: args.narration,
        character_position: match args.position {
            PositionChoice::Left => usandthen::CharacterPosition::Left,
            PositionChoice::Right => usandthen::CharacterPosition::Right,
        },
    })?;

    ensure_parent(&args.out)?;
    result
        .image
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    if let Some(mask_path) = &args.mask {
        let (w, h) = result.image.dimensions();
        let mask =
            usandthen::text_protect_mask(w, h, &result.actual_text_bounds, args.mask_padding);
        ensure_parent(mask_path)?;
        mask.save_with_format(mask_path, image::ImageFormat::Png)
            .with_context(|| format!("write mask '{}'", mask_path.display()))?;
        eprintln!("wrote {}", mask_path.display());
    }

    let summary = serde_json::json!({
        "actualTextBounds": result.actual_text_bounds,
        "characterPanel": result.character_panel,
        "textPanel": result.text_panel,
        "characterRect": result.character_rect,
        "linesDrawn": result.lines_drawn,
        "linesTotal": result.lines_total,
    });
    write_output(None, &serde_json::to_string_pretty(&summary)?)
}

fn cmd_render(config: &usandthen::Config, args: RenderArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read layout '{}'", args.in_path.display()))?;
    let layout = usandthen::PageLayout::from_json(&text)?;

    let settings = usandthen::RenderSettings {
        scale: args.scale,
        pixel_ratio: args.pixel_ratio,
        ..usandthen::RenderSettings::print()
    };
    let (width, height) = settings.output_size(&layout.canvas)?;
    let font = config.load_font()?;

    let kind = match args.renderer {
        RendererChoice::Auto => usandthen::RendererKind::detect(width, height, font.as_ref()),
        RendererChoice::Vello => usandthen::RendererKind::Vello,
        RendererChoice::Basic => usandthen::RendererKind::Basic,
    };
    let mut renderer = usandthen::create_renderer(kind, &settings, font.as_ref())?;

    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let images = usandthen::ImageStore::for_layout(&layout, root);
    let frame = renderer.render(&layout, &images)?;

    ensure_parent(&args.out)?;
    frame
        .to_rgba_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
