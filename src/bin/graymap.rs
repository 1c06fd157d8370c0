use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use graymap::{
    FileType, Histogram, Mask, MaskPreset, Pgm, PixelBuffer, Processor, ProcessorOpts,
    ResampleFilter, Script,
};

#[derive(Parser, Debug)]
#[command(name = "graymap", version, about = "Single-channel PGM processing")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print dimensions, depth and intensity statistics.
    Info(InfoArgs),
    /// Run a JSON operation script on an image.
    Apply(ApplyArgs),
    /// Resize an image.
    Scale(ScaleArgs),
    /// Convolve an image with a built-in mask.
    Mask(MaskArgs),
    /// Write histogram tables as CSV.
    Histogram(HistogramArgs),
    /// Time every resampling filter on one image.
    Bench(BenchArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input PGM.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct OutputArgs {
    /// Output PGM path.
    #[arg(long)]
    out: PathBuf,

    /// Output encoding; defaults to the input's.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Comment line written into the output header.
    #[arg(long)]
    comment: Option<String>,

    /// Also write an 8-bit PNG preview here.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Row partitions (and worker threads) per transform.
    #[arg(long, default_value_t = graymap::DEFAULT_WORKERS)]
    workers: usize,
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input PGM.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Operation script (JSON). Relative frame operands resolve against its directory.
    #[arg(long)]
    script: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Parser, Debug)]
struct ScaleArgs {
    /// Input PGM.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Target width.
    #[arg(long)]
    width: Option<usize>,

    /// Target height.
    #[arg(long)]
    height: Option<usize>,

    /// Uniform scale factor, used when neither dimension is given.
    #[arg(long, default_value_t = 1.0)]
    factor: f64,

    /// Interpolation kernel.
    #[arg(long, value_enum, default_value_t = FilterArg::Nearest)]
    filter: FilterArg,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// Input PGM.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Built-in mask name, e.g. `gaussian_blur3x3` or `edge_laplacian5x5`.
    #[arg(long)]
    preset: String,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Parser, Debug)]
struct HistogramArgs {
    /// Input PGM.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Distribution CSV path.
    #[arg(long)]
    out: PathBuf,

    /// Cumulative equalization CSV path.
    #[arg(long)]
    equalized: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BenchArgs {
    /// Input PGM.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Uniform scale factor.
    #[arg(long, default_value_t = 3.0)]
    factor: f64,

    /// Row partitions (and worker threads) per transform.
    #[arg(long, default_value_t = graymap::DEFAULT_WORKERS)]
    workers: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    /// ASCII samples.
    P2,
    /// Binary samples.
    P5,
}

impl From<FormatArg> for FileType {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::P2 => FileType::P2,
            FormatArg::P5 => FileType::P5,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterArg {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos2,
}

impl From<FilterArg> for ResampleFilter {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::Nearest => ResampleFilter::Nearest,
            FilterArg::Bilinear => ResampleFilter::Bilinear,
            FilterArg::Bicubic => ResampleFilter::Bicubic,
            FilterArg::Lanczos2 => ResampleFilter::Lanczos2,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Apply(args) => cmd_apply(args),
        Command::Scale(args) => cmd_scale(args),
        Command::Mask(args) => cmd_mask(args),
        Command::Histogram(args) => cmd_histogram(args),
        Command::Bench(args) => cmd_bench(args),
    }
}

fn load(path: &Path) -> anyhow::Result<Pgm> {
    Pgm::load(path).with_context(|| format!("load '{}'", path.display()))
}

fn processor(workers: usize) -> anyhow::Result<Processor> {
    Processor::new(ProcessorOpts { workers }).context("build processor")
}

fn report(name: &str, elapsed: Duration) {
    eprintln!("{name:<10} {:>10.3} ms", elapsed.as_secs_f64() * 1000.0);
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let pgm = load(&args.in_path)?;
    let buf = &pgm.buffer;
    let hist = Histogram::from_buffer(buf)?;
    println!("file:     {}", args.in_path.display());
    println!("type:     {}", pgm.file_type);
    println!("size:     {}x{}", buf.columns(), buf.rows());
    println!("depth:    {}", buf.depth());
    println!("min/max:  {}/{}", buf.min_value(), buf.max_value());
    println!("mean:     {:.4}", hist.mean());
    println!("variance: {:.4}", hist.variance());
    Ok(())
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let mut pgm = load(&args.in_path)?;
    let script = Script::load(&args.script)
        .with_context(|| format!("load script '{}'", args.script.display()))?;
    let base = args
        .script
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let engine = processor(args.output.workers)?;
    let timings = graymap::run_script(&engine, &mut pgm.buffer, &script, &base)?;
    for t in &timings {
        report(t.name, t.elapsed);
    }
    write_output(pgm, &args.output)
}

fn cmd_scale(args: ScaleArgs) -> anyhow::Result<()> {
    let mut pgm = load(&args.in_path)?;
    let engine = processor(args.output.workers)?;
    let filter = ResampleFilter::from(args.filter);

    let started = Instant::now();
    match (args.width, args.height) {
        (None, None) => engine.scale_by(&mut pgm.buffer, args.factor, filter)?,
        (w, h) => {
            let new_width = w.unwrap_or(pgm.buffer.columns());
            let new_height = h.unwrap_or(pgm.buffer.rows());
            engine.scale(&mut pgm.buffer, new_width, new_height, filter)?
        }
    }
    report("scale", started.elapsed());
    write_output(pgm, &args.output)
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<()> {
    let preset: MaskPreset = serde_json::from_value(serde_json::Value::String(args.preset.clone()))
        .with_context(|| format!("unknown mask preset '{}'", args.preset))?;
    let mut pgm = load(&args.in_path)?;
    let engine = processor(args.output.workers)?;

    let started = Instant::now();
    engine.mask(&mut pgm.buffer, &Mask::preset(preset))?;
    report("mask", started.elapsed());
    write_output(pgm, &args.output)
}

fn cmd_histogram(args: HistogramArgs) -> anyhow::Result<()> {
    let pgm = load(&args.in_path)?;
    let hist = Histogram::from_buffer(&pgm.buffer)?;
    hist.save_csv(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    if let Some(path) = &args.equalized {
        hist.save_equalized_csv(path)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_bench(args: BenchArgs) -> anyhow::Result<()> {
    let pgm = load(&args.in_path)?;
    let engine = processor(args.workers)?;
    eprintln!(
        "{}x{} x{} on {} workers",
        pgm.buffer.columns(),
        pgm.buffer.rows(),
        args.factor,
        engine.workers()
    );
    for filter in [
        FilterArg::Nearest,
        FilterArg::Bilinear,
        FilterArg::Bicubic,
        FilterArg::Lanczos2,
    ] {
        let mut buf = pgm.buffer.clone();
        let started = Instant::now();
        engine.scale_by(&mut buf, args.factor, filter.into())?;
        report(&format!("{filter:?}").to_lowercase(), started.elapsed());
    }
    Ok(())
}

fn write_output(mut pgm: Pgm, output: &OutputArgs) -> anyhow::Result<()> {
    if let Some(format) = output.format {
        pgm.file_type = format.into();
    }
    pgm.save(&output.out, output.comment.as_deref())?;
    eprintln!("wrote {}", output.out.display());

    if let Some(png) = &output.png {
        write_png(&pgm.buffer, png)?;
        eprintln!("wrote {}", png.display());
    }
    Ok(())
}

fn write_png(buf: &PixelBuffer, path: &Path) -> anyhow::Result<()> {
    let width = u32::try_from(buf.columns()).context("image too wide for png")?;
    let height = u32::try_from(buf.rows()).context("image too tall for png")?;
    let depth = u32::try_from(buf.depth()).context("negative depth")?.max(1);
    let data: Vec<u8> = buf
        .export_samples()
        .iter()
        .map(|&v| (v.max(0) as u32 * 255 / depth) as u8)
        .collect();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &data,
        width,
        height,
        image::ColorType::L8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
