use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wordmark::{
    CONFIG_FILE_NAME, Canvas, Config, FontFace, FontFormat, FontStyle, ViewBox, build_prompt,
    decode_icon, download_file_name, format_number, sanitize_icon,
};

#[derive(Parser)]
#[command(name = "wordmark")]
#[command(about = "Compose a generated icon and a brand name into an SVG logo", long_about = None)]
struct Cli {
    /// Config file (default: ./wordmark.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose a logo from an icon SVG and a brand name
    Compose {
        /// Icon SVG from the image provider (use - for stdin)
        #[arg(long)]
        icon: PathBuf,

        /// Brand name written next to the icon
        #[arg(long)]
        brand: String,

        /// Logo style, picks the font pool
        #[arg(long, default_value = "calm")]
        style: FontStyle,

        /// Seed for the font pick
        #[arg(long)]
        seed: Option<u64>,

        /// Embed this font file instead of picking from the registry
        #[arg(long)]
        font_file: Option<PathBuf>,

        /// Family name for --font-file (default: the file stem)
        #[arg(long, requires = "font_file")]
        font_name: Option<String>,

        /// Canvas width
        #[arg(long, required_unless_present = "json")]
        width: Option<f64>,

        /// Canvas height
        #[arg(long, required_unless_present = "json")]
        height: Option<f64>,

        /// Canvas viewBox as "x y w h" (default: 0 0 width height)
        #[arg(long)]
        view_box: Option<ViewBox>,

        /// Print the composition fragments as JSON instead of an SVG document
        #[arg(long)]
        json: bool,

        /// Output file or directory (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Strip the XML prolog and outer <svg> wrapper from an icon
    Sanitize {
        /// Input file (use - for stdin)
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Print the layout numbers for a brand name
    Layout {
        brand: String,
    },

    /// Print the icon generation prompt
    Prompt {
        #[arg(long)]
        description: String,

        #[arg(long, default_value = "calm")]
        style: FontStyle,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Compose {
            icon,
            brand,
            style,
            seed,
            font_file,
            font_name,
            width,
            height,
            view_box,
            json,
            output,
        } => {
            let raw_icon = decode_icon(read_input(&icon)?)?;

            let font = match font_file {
                Some(path) => load_font_file(&path, font_name)?,
                None => {
                    let mut rng = match seed {
                        Some(seed) => StdRng::seed_from_u64(seed),
                        None => StdRng::from_entropy(),
                    };
                    config
                        .registry()
                        .map_err(|e| format!("{e} (configure [fonts.styles] or pass --font-file)"))?
                        .resolve(style, &mut rng, &config.font_source())?
                }
            };

            let composition = config.composer().compose(&raw_icon, &brand, &font);

            let rendered = match (json, width, height) {
                (true, _, _) => serde_json::to_string_pretty(&composition)?,
                (false, Some(width), Some(height)) => {
                    let mut canvas = Canvas::new(width, height);
                    canvas.view_box = view_box;
                    canvas.wrap(&composition)
                }
                _ => return Err("--width and --height are required".into()),
            };

            let output = if output.is_dir() {
                output.join(download_file_name(&brand))
            } else {
                output
            };
            write_output(&output, &rendered)?;
        }

        Command::Sanitize { input } => {
            let raw = decode_icon(read_input(&input)?)?;
            write_output(Path::new("-"), &sanitize_icon(&raw))?;
        }

        Command::Layout { brand } => {
            let precision = config.compose.precision;
            let layout = config.layout.for_brand(&brand);
            println!("font_size: {}", format_number(layout.font_size, precision));
            println!("icon_scale: {}", format_number(layout.icon_scale, precision));
            println!(
                "translate_offset: {}",
                format_number(layout.translate_offset, precision)
            );
        }

        Command::Prompt { description, style } => {
            println!("{}", build_prompt(&description, style));
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> wordmark::Result<Config> {
    if let Some(path) = path {
        return Config::load(path);
    }
    let local = Path::new(CONFIG_FILE_NAME);
    if local.is_file() {
        return Config::load(local);
    }
    debug!("no config file, using defaults");
    Ok(Config::default())
}

fn load_font_file(path: &Path, name: Option<String>) -> wordmark::Result<FontFace> {
    let bytes = fs::read(path).map_err(|source| wordmark::Error::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    let name = name.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .map(FontFormat::from_extension)
        .unwrap_or_default();
    info!(font = %name, bytes = bytes.len(), "using font file");
    Ok(FontFace::from_bytes(name, &bytes, format))
}

fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}

fn write_output(path: &Path, content: &str) -> io::Result<()> {
    if path.as_os_str() == "-" {
        let mut stdout = io::stdout();
        stdout.write_all(content.as_bytes())?;
        stdout.write_all(b"\n")
    } else {
        fs::write(path, content)
    }
}
