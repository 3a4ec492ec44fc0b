//! xpix: command-line photo adjustment and watermarking.

mod assets;
mod font;
mod image_io;
mod info;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xpix_core::config::default_config_path;
use xpix_core::geometry::{crop_to, resize_to};
use xpix_core::{
    AdjustmentSpec, Config, PixelBuffer, WatermarkRequest, WatermarkSpec, adjust, apply_watermark,
};

use crate::assets::FileAssets;
use crate::font::default_font_path;
use crate::image_io::{load_image, save_image};
use crate::info::ImageInfo;

#[derive(Parser, Debug)]
#[command(name = "xpix", version, about = "Photo adjustment and watermarking")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/xpix/config.json).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tonal and color adjustments.
    Adjust(AdjustArgs),
    /// Cut out a rectangle.
    Crop(CropArgs),
    /// Change pixel dimensions.
    Resize(ResizeArgs),
    /// Stamp a text or image watermark.
    Watermark(WatermarkArgs),
    /// Show file facts and EXIF metadata.
    Info {
        image: PathBuf,
    },
    /// Manage the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a config file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration.
    Show,
    /// Print the config file location.
    Path,
}

#[derive(Args, Debug)]
struct AdjustArgs {
    image: PathBuf,

    /// Brightness (-100 to 100).
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    brightness: f64,

    /// Contrast (-100 to 100).
    #[arg(short = 't', long, default_value_t = 0.0, allow_negative_numbers = true)]
    contrast: f64,

    /// Saturation (-100 to 100).
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    saturation: f64,

    /// Exposure (-100 to 100).
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    exposure: f64,

    /// Sharpen strength (0 to 100).
    #[arg(long, default_value_t = 0.0)]
    sharpen: f64,

    /// Gamma (0.1 to 3.0).
    #[arg(long, default_value_t = 1.0)]
    gamma: f64,

    /// White point in Kelvin (2000 to 10000, 6500 is daylight).
    #[arg(long, default_value_t = 6500)]
    temperature: i32,

    /// Dehaze strength (0 to 100).
    #[arg(long, default_value_t = 0.0)]
    dehaze: f64,

    /// Output path (default: <name>_adjusted.<ext>).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CropArgs {
    image: PathBuf,

    #[arg(short, default_value_t = 0)]
    x: u32,

    #[arg(short, default_value_t = 0)]
    y: u32,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    /// Output path (default: <name>_cropped.<ext>).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ResizeArgs {
    image: PathBuf,

    /// Target width; 0 derives it from the height.
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Target height; 0 derives it from the width.
    #[arg(long, default_value_t = 0)]
    height: u32,

    /// Keep the aspect ratio.
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    keep_ratio: bool,

    /// Output path (default: <name>_resized.<ext>).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct WatermarkArgs {
    image: PathBuf,

    /// Watermark text.
    #[arg(short, long)]
    text: Option<String>,

    /// Watermark image file.
    #[arg(long = "image")]
    overlay: Option<PathBuf>,

    /// Anchor: top-left, top-center, ..., bottom-right.
    #[arg(short, long)]
    position: Option<String>,

    /// Opacity (0 to 1). Defaults to the configured value.
    #[arg(long)]
    opacity: Option<f64>,

    /// Output path (default: <name>_watermarked.<ext>).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    match cli.cmd {
        Command::Adjust(args) => cmd_adjust(args, &load_config(config_path)?),
        Command::Crop(args) => cmd_crop(args, &load_config(config_path)?),
        Command::Resize(args) => cmd_resize(args, &load_config(config_path)?),
        Command::Watermark(args) => cmd_watermark(args, &load_config(config_path)?),
        Command::Info { image } => cmd_info(&image),
        Command::Config(cmd) => cmd_config(cmd, config_path),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load(path).context("load config")
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_adjust(args: AdjustArgs, config: &Config) -> anyhow::Result<()> {
    let spec = AdjustmentSpec {
        brightness: args.brightness,
        contrast: args.contrast,
        saturation: args.saturation,
        exposure: args.exposure,
        sharpen: args.sharpen,
        gamma: args.gamma,
        temperature: args.temperature,
        dehaze: args.dehaze,
    };
    let image = read_input(&args.image)?;
    let result = adjust(image, &spec);
    write_output(&result, &args.image, args.output, "_adjusted", config)
}

fn cmd_crop(args: CropArgs, config: &Config) -> anyhow::Result<()> {
    let image = read_input(&args.image)?;
    let result = crop_to(&image, args.x, args.y, args.width, args.height)?;
    write_output(&result, &args.image, args.output, "_cropped", config)
}

fn cmd_resize(args: ResizeArgs, config: &Config) -> anyhow::Result<()> {
    let image = read_input(&args.image)?;
    let result = resize_to(&image, args.width, args.height, args.keep_ratio)?;
    write_output(&result, &args.image, args.output, "_resized", config)
}

fn cmd_watermark(args: WatermarkArgs, config: &Config) -> anyhow::Result<()> {
    let request = WatermarkRequest {
        text: args.text.unwrap_or_default(),
        image: args
            .overlay
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        position: args.position.unwrap_or_default(),
        opacity: args.opacity.unwrap_or(0.0),
    };
    // Validate before decoding anything.
    let spec = WatermarkSpec::from_request(&request, &config.watermark)?;

    let image = read_input(&args.image)?;
    let assets = FileAssets::new(config.watermark.font_path.clone());
    let result = apply_watermark(image, &spec, &config.watermark, &assets)?;
    write_output(&result, &args.image, args.output, "_watermarked", config)
}

fn cmd_info(path: &Path) -> anyhow::Result<()> {
    let info = ImageInfo::read(path).with_context(|| format!("read '{}'", path.display()))?;
    println!("{info}");
    Ok(())
}

fn cmd_config(cmd: ConfigCommand, explicit: Option<&Path>) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Init { force } => {
            let path = config_location(explicit)?;
            if path.exists() && !force {
                anyhow::bail!(
                    "config file '{}' already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(&path)?;
            println!("created default config: {}", path.display());
        }
        ConfigCommand::Show => {
            let config = load_config(explicit)?;
            println!("{}", config.to_json());
            let font = config.watermark.font_path.clone().or_else(default_font_path);
            match font {
                Some(font) => println!("font: {}", font.display()),
                None => println!("font: <none>"),
            }
        }
        ConfigCommand::Path => match explicit {
            Some(path) => println!("current config: {}", path.display()),
            None => println!("default config: {}", config_location(None)?.display()),
        },
    }
    Ok(())
}

fn config_location(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path().context("cannot determine a config directory (HOME unset)"),
    }
}

fn read_input(path: &Path) -> anyhow::Result<PixelBuffer> {
    load_image(path).with_context(|| format!("open image '{}'", path.display()))
}

fn write_output(
    image: &PixelBuffer,
    input: &Path,
    output: Option<PathBuf>,
    suffix: &str,
    config: &Config,
) -> anyhow::Result<()> {
    let out = output.unwrap_or_else(|| add_suffix(input, suffix));
    save_image(image, &out, &config.output)
        .with_context(|| format!("write image '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

/// `photos/cat.jpg` + `_adjusted` → `photos/cat_adjusted.jpg`.
fn add_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_suffix_keeps_directory_and_extension() {
        assert_eq!(
            add_suffix(Path::new("photos/cat.jpg"), "_adjusted"),
            PathBuf::from("photos/cat_adjusted.jpg")
        );
        assert_eq!(add_suffix(Path::new("raw"), "_cropped"), PathBuf::from("raw_cropped"));
        assert_eq!(
            add_suffix(Path::new("a.b.png"), "_resized"),
            PathBuf::from("a.b_resized.png")
        );
    }

    #[test]
    fn test_adjust_accepts_negative_values() {
        let cli = Cli::try_parse_from(["xpix", "adjust", "in.png", "-b", "-20", "--contrast", "-5"])
            .unwrap();
        let Command::Adjust(args) = cli.cmd else {
            panic!("expected adjust");
        };
        assert_eq!(args.brightness, -20.0);
        assert_eq!(args.contrast, -5.0);
        assert_eq!(args.temperature, 6500);
        assert_eq!(args.gamma, 1.0);
    }

    #[test]
    fn test_resize_keep_ratio_defaults_on() {
        let cli = Cli::try_parse_from(["xpix", "resize", "in.png", "--width", "100"]).unwrap();
        let Command::Resize(args) = cli.cmd else {
            panic!("expected resize");
        };
        assert!(args.keep_ratio);
        assert_eq!((args.width, args.height), (100, 0));

        let argv = ["xpix", "resize", "in.png", "--width", "10", "-k", "false"];
        let cli = Cli::try_parse_from(argv).unwrap();
        let Command::Resize(args) = cli.cmd else {
            panic!("expected resize");
        };
        assert!(!args.keep_ratio);
    }

    #[test]
    fn test_watermark_leaves_unset_fields_to_config() {
        let cli = Cli::try_parse_from(["xpix", "watermark", "in.png", "-t", "hello"]).unwrap();
        let Command::Watermark(args) = cli.cmd else {
            panic!("expected watermark");
        };
        assert_eq!(args.text.as_deref(), Some("hello"));
        assert!(args.position.is_none());
        assert!(args.opacity.is_none());
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let argv = ["xpix", "config", "path", "--config", "/tmp/x.json"];
        let cli = Cli::try_parse_from(argv).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.json")));
    }
}
