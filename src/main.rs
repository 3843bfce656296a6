use anyhow::{Result, anyhow};
use clap::{ArgGroup, Parser};
use jpegresize::config::{FilterChoice, ResizeConfig};
use jpegresize::{kernel_dump, resize_jpeg};
use jpegresize_core::{Size, TargetDirective};
use std::path::PathBuf;

/// Resize a JPEG with a separable convolution filter, streaming rows so only a
/// small window of the source is held in memory.
#[derive(Parser, Debug)]
#[command(name = "jpegresize")]
#[command(about = "Resize JPEG images with high-quality convolution filters")]
#[command(override_usage = "jpegresize [-flags] [-param <val>] <w>x<h> <input.jpg> <output.jpg>")]
#[command(allow_negative_numbers = true)]
#[command(group(ArgGroup::new("mode").multiple(false).args([
    "set_size", "max_size", "min_size", "set_area", "max_area", "min_area",
])))]
#[command(group(ArgGroup::new("filter").multiple(false).args([
    "flat", "linear", "hermite", "catrom", "mitchell", "keys", "lanczos",
])))]
struct Args {
    /// Width and height of output image, e.g. '200x200'
    #[arg(value_parser = parse_size, required_unless_present = "kernel")]
    size: Option<Size>,

    /// Input image; must be a grayscale or RGB JPEG
    #[arg(required_unless_present = "kernel")]
    input: Option<PathBuf>,

    /// Output image; clobbers any existing file
    #[arg(required_unless_present = "kernel")]
    output: Option<PathBuf>,

    /// Default mode: set to given size, ignoring aspect ratio
    #[arg(long)]
    set_size: bool,

    /// Keep aspect ratio, reducing to within given box
    #[arg(long)]
    max_size: bool,

    /// Keep aspect ratio, enlarging to contain given box
    #[arg(long)]
    min_size: bool,

    /// Keep aspect ratio, reducing/enlarging to area of given box
    #[arg(long)]
    set_area: bool,

    /// Keep aspect ratio, reducing to area of given box
    #[arg(long)]
    max_area: bool,

    /// Keep aspect ratio, enlarging to area of given box
    #[arg(long)]
    min_area: bool,

    /// JPEG quality of output image; default depends on size
    #[arg(short, long, value_name = "PCT")]
    quality: Option<u8>,

    /// Radius of convolution kernel, > 0
    #[arg(short, long, default_value_t = 1.0)]
    radius: f32,

    /// Amount to sharpen output, >= 0
    #[arg(short, long = "sharp", default_value_t = 0.2)]
    sharp: f32,

    /// Average pixels within box of given radius
    #[arg(long)]
    flat: bool,

    /// Weight pixels within box linearly by closeness
    #[arg(long)]
    linear: bool,

    /// Hermite cubic spline filter; similar to Gaussian
    #[arg(long)]
    hermite: bool,

    /// Catmull-Rom cubic spline; default is M = 0.5. Optional values are
    /// greedy, so give the flag after the positionals when omitting M.
    #[arg(long, value_name = "M", num_args = 0..=1, default_missing_value = "0.5")]
    catrom: Option<f32>,

    /// Mitchell-Netravali filter (Keys with B = C = 1/3)
    #[arg(long)]
    mitchell: bool,

    /// Keys family filters; default is B = C = 1/3 (Mitchell)
    #[arg(long, value_names = ["B", "C"], num_args = 0..=2)]
    keys: Option<Vec<f32>>,

    /// Lanczos windowed sinc filter; default is N = 3 lobes
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "3")]
    lanczos: Option<f32>,

    /// Verbose / debug mode
    #[arg(short, long)]
    verbose: bool,

    /// Dump convolution kernel without processing image
    #[arg(short, long)]
    kernel: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = build_config(&args);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level()))
        .init();

    if config.kernel_dump {
        config.validate_filter()?;
        for line in kernel_dump(&config.filter_spec()) {
            println!("{}", line);
        }
        return Ok(());
    }

    resize_jpeg(&config)?;
    Ok(())
}

fn build_config(args: &Args) -> ResizeConfig {
    let mut config = ResizeConfig {
        target_box: args.size.unwrap_or(Size::new(1, 1)),
        directive: directive(args),
        filter: filter_choice(args),
        radius: args.radius,
        sharpen: args.sharp,
        quality: args.quality,
        verbose: args.verbose,
        kernel_dump: args.kernel,
        ..ResizeConfig::default()
    };
    if let (Some(input), Some(output)) = (&args.input, &args.output) {
        config.input = input.clone();
        config.output = output.clone();
    }
    config
}

fn directive(args: &Args) -> TargetDirective {
    if args.max_size {
        TargetDirective::BoundedShrink
    } else if args.min_size {
        TargetDirective::BoundedGrow
    } else if args.set_area {
        TargetDirective::AreaExact
    } else if args.max_area {
        TargetDirective::AreaShrink
    } else if args.min_area {
        TargetDirective::AreaGrow
    } else {
        TargetDirective::Exact
    }
}

fn filter_choice(args: &Args) -> FilterChoice {
    if args.flat {
        FilterChoice::Flat
    } else if args.linear {
        FilterChoice::Linear
    } else if args.hermite {
        FilterChoice::Hermite
    } else if let Some(m) = args.catrom {
        FilterChoice::CatmullRom { m }
    } else if args.mitchell {
        FilterChoice::Mitchell
    } else if let Some(params) = &args.keys {
        let b = params.first().copied().unwrap_or(1.0 / 3.0);
        let c = params.get(1).copied().unwrap_or(1.0 / 3.0);
        FilterChoice::Keys { b, c }
    } else if let Some(lobes) = args.lanczos {
        FilterChoice::Lanczos { lobes }
    } else {
        FilterChoice::default()
    }
}

/// Parse a size string like "200x150"
fn parse_size(s: &str) -> Result<Size> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| anyhow!("Invalid size: {}. Use <w>x<h>, e.g. 200x200", s))?;
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if !digits(w) || !digits(h) {
        return Err(anyhow!("Invalid size: {}. Use <w>x<h>, e.g. 200x200", s));
    }
    Ok(Size::new(w.parse()?, h.parse()?))
}
