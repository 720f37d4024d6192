use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use handlebars::Handlebars;
use image::{ImageReader, Rgba, RgbaImage};
use mosaic_layout_core::{
    ItemSize, Layout, MosaicConfig, compute_placements, to_json_array, to_json_hash,
};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "mosaic-layout",
    about = "Lay out photos on a block-grid mosaic canvas",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute a mosaic layout for a directory of images or a size manifest
    Layout(LayoutArgs),
    /// Generate a random size manifest (for experimenting without images)
    Gen(GenArgs),
    /// Simple timing bench (lays out once, prints time + coverage)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct LayoutArgs {
    // Input/Output
    /// Input directory of images, a single image, or a JSON size manifest
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Layout base name (files will be name.json/.html/.png)
    #[arg(short, long, default_value = "mosaic", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides canvas/grid options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Canvas/Grid
    /// Canvas width in pixels
    #[arg(long, default_value_t = 1024.0, help_heading = "Canvas/Grid")]
    canvas_width: f64,
    /// Canvas height in pixels
    #[arg(long, default_value_t = 768.0, help_heading = "Canvas/Grid")]
    canvas_height: f64,
    /// Number of grid columns
    #[arg(long, default_value_t = 4, help_heading = "Canvas/Grid")]
    columns: usize,
    /// Number of grid rows
    #[arg(long, default_value_t = 3, help_heading = "Canvas/Grid")]
    rows: usize,
    /// Gutter width between blocks (pixels)
    #[arg(long, default_value_t = 2.0, help_heading = "Canvas/Grid")]
    spacing: f64,
    /// Reserve gutters along the canvas edges as well
    #[arg(long, default_value_t = false, help_heading = "Canvas/Grid")]
    outer_gutters: bool,
    /// Evaluate scale variants in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Canvas/Grid")]
    parallel: bool,

    // Export
    /// Metadata format: json-hash | json (alias) | json-array | html
    #[arg(long, default_value = "json-hash", help_heading = "Export")]
    format: String,
    /// External template file (handlebars), used when --format html
    #[arg(long, help_heading = "Export")]
    template: Option<PathBuf>,
    /// Render a PNG preview of the placements to this file
    #[arg(long, help_heading = "Export")]
    preview: Option<PathBuf>,
    /// Export layout stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct GenArgs {
    /// Output manifest path (JSON)
    out: PathBuf,
    /// Number of items to generate
    #[arg(long, default_value_t = 24)]
    count: usize,
    /// Minimum side length (pixels)
    #[arg(long, default_value_t = 400.0)]
    min_side: f64,
    /// Maximum side length (pixels)
    #[arg(long, default_value_t = 4000.0)]
    max_side: f64,
    /// RNG seed (omit for a random one)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Input directory of images or a JSON size manifest
    input: PathBuf,
    /// Canvas width in pixels
    #[arg(long, default_value_t = 1024.0)]
    canvas_width: f64,
    /// Canvas height in pixels
    #[arg(long, default_value_t = 768.0)]
    canvas_height: f64,
    /// Number of grid columns
    #[arg(long, default_value_t = 4)]
    columns: usize,
    /// Number of grid rows
    #[arg(long, default_value_t = 3)]
    rows: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Layout(args) => run_layout(args, cli.progress && !cli.quiet),
        Commands::Gen(args) => run_gen(args),
        Commands::Bench(args) => run_bench(args),
    }
}

fn run_layout(cli: &LayoutArgs, show_progress: bool) -> anyhow::Result<()> {
    // Load config file if provided; config file overrides canvas/grid options en bloc
    let cfg = if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_mosaic_config(config_from_args(cli))
    } else {
        config_from_args(cli)
    };

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let items = load_items(&cli.input, &cli.include, &cli.exclude, show_progress)?;
    info!(count = items.len(), "loaded input sizes");

    let layout = compute_placements(&items, &cfg)?;

    let stats = layout.stats();
    info!(
        placed = stats.num_placed,
        dropped = stats.num_dropped,
        scale = format!("{:.3}", layout.meta.scale),
        coverage = format!("{:.2}%", stats.coverage * 100.0),
        "stats"
    );

    if !cli.dry_run {
        fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    }

    match cli.format.as_str() {
        // Accept "json" as an alias of "json-hash", the indexed frame mapping
        "json-hash" | "json" => {
            if !cli.dry_run {
                let json_path = cli.out_dir.join(format!("{}.json", cli.name));
                let json = serde_json::to_string_pretty(&to_json_hash(&layout))?;
                fs::write(&json_path, json)
                    .with_context(|| format!("write {}", json_path.display()))?;
                info!(?json_path, frames = layout.frames.len(), "layout written");
            }
        }
        "json-array" => {
            if !cli.dry_run {
                let json_path = cli.out_dir.join(format!("{}.json", cli.name));
                let json = serde_json::to_string_pretty(&to_json_array(&layout))?;
                fs::write(&json_path, json)
                    .with_context(|| format!("write {}", json_path.display()))?;
                info!(?json_path, frames = layout.frames.len(), "layout written");
            }
        }
        "html" => {
            let ctx = build_html_context(&layout);
            let tpl_owned_from_file: Option<String> = if let Some(path) = &cli.template {
                Some(fs::read_to_string(path)?)
            } else {
                None
            };
            let tpl_ref: &str = if let Some(ref s) = tpl_owned_from_file {
                s.as_str()
            } else {
                include_str!("templates/preview.hbs")
            };
            let mut reg = Handlebars::new();
            reg.set_strict_mode(true);
            reg.register_template_string("tpl", tpl_ref)?;
            let rendered = reg.render("tpl", &ctx)?;
            if !cli.dry_run {
                let out_path = cli.out_dir.join(format!("{}.html", cli.name));
                fs::write(&out_path, rendered)
                    .with_context(|| format!("write {}", out_path.display()))?;
                info!(?out_path, frames = layout.frames.len(), "preview written");
            }
        }
        other => anyhow::bail!("unknown metadata format: {}", other),
    }

    if let Some(preview_path) = &cli.preview {
        let img = render_preview(&layout);
        if !cli.dry_run {
            img.save(preview_path)
                .with_context(|| format!("write {}", preview_path.display()))?;
            info!(?preview_path, "preview rendered");
        }
    }

    if let Some(stats_path) = &cli.export_stats {
        let value = serde_json::json!({
            "items": stats.num_items,
            "placed": stats.num_placed,
            "dropped": stats.num_dropped,
            "scale": layout.meta.scale,
            "covered_area": stats.covered_area,
            "canvas_area": stats.canvas_area,
            "coverage": stats.coverage,
        });
        if !cli.dry_run {
            fs::write(stats_path, serde_json::to_string_pretty(&value)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!(
                "items={} placed={} dropped={} scale={:.3} coverage={:.2}%",
                stats.num_items,
                stats.num_placed,
                stats.num_dropped,
                layout.meta.scale,
                stats.coverage * 100.0
            );
        }
    }
    Ok(())
}

fn run_gen(cli: &GenArgs) -> anyhow::Result<()> {
    let mut rng = match cli.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };
    anyhow::ensure!(
        cli.min_side > 0.0 && cli.max_side > cli.min_side,
        "min_side must be positive and smaller than max_side"
    );
    let items: Vec<ManifestItem> = (0..cli.count)
        .map(|_| ManifestItem {
            width: rng.gen_range(cli.min_side..cli.max_side),
            height: rng.gen_range(cli.min_side..cli.max_side),
        })
        .collect();
    fs::write(&cli.out, serde_json::to_string_pretty(&items)?)
        .with_context(|| format!("write {}", cli.out.display()))?;
    info!(out = ?cli.out, count = items.len(), "manifest written");
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    use std::time::Instant;
    // Minimal bench: lay out once and print time + coverage
    let items = load_items(&b.input, &[], &[], false)?;
    let cfg = MosaicConfig {
        canvas_width: b.canvas_width,
        canvas_height: b.canvas_height,
        columns: b.columns,
        rows: b.rows,
        ..Default::default()
    };
    let start = Instant::now();
    let layout = compute_placements(&items, &cfg)?;
    let dur = start.elapsed();
    let stats = layout.stats();
    println!(
        "placed={}/{} scale={:.3} coverage={:.2}% time={}",
        stats.num_placed,
        stats.num_items,
        layout.meta.scale,
        stats.coverage * 100.0,
        bench_fmt_dur(dur)
    );
    Ok(())
}

fn bench_fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn config_from_args(cli: &LayoutArgs) -> MosaicConfig {
    MosaicConfig {
        canvas_width: cli.canvas_width,
        canvas_height: cli.canvas_height,
        columns: cli.columns,
        rows: cli.rows,
        spacing: cli.spacing,
        outer_gutters: cli.outer_gutters,
        parallel: cli.parallel,
    }
}

/// Item sizes come either from a JSON manifest (`.json`) or by probing
/// image headers under a file/directory path.
fn load_items(
    input: &Path,
    include: &[String],
    exclude: &[String],
    show_progress: bool,
) -> anyhow::Result<Vec<ItemSize>> {
    if input.extension().and_then(|e| e.to_str()) == Some("json") {
        let file = fs::read_to_string(input)
            .with_context(|| format!("read manifest {}", input.display()))?;
        let manifest: Vec<ManifestItem> = serde_json::from_str(&file)?;
        return Ok(manifest
            .iter()
            .map(|m| ItemSize::new(m.width, m.height))
            .collect());
    }
    let paths = gather_paths(input, include, exclude)?;
    probe_sizes_with_progress(&paths, show_progress)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    list.sort();
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}

/// Reads only the image headers; no pixel data is decoded.
fn probe_sizes_with_progress(paths: &[PathBuf], progress: bool) -> anyhow::Result<Vec<ItemSize>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} probing {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap(),
        );
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match probe_size(p) {
            Ok((w, h)) => list.push(ItemSize::new(w as f64, h as f64)),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn probe_size(p: &Path) -> anyhow::Result<(u32, u32)> {
    let dims = ImageReader::open(p)?.with_guessed_format()?.into_dimensions()?;
    Ok(dims)
}

const PREVIEW_PALETTE: [Rgba<u8>; 6] = [
    Rgba([122, 162, 247, 255]),
    Rgba([158, 206, 106, 255]),
    Rgba([224, 175, 104, 255]),
    Rgba([187, 154, 247, 255]),
    Rgba([125, 207, 255, 255]),
    Rgba([247, 118, 142, 255]),
];

fn render_preview(layout: &Layout) -> RgbaImage {
    let width = layout.meta.canvas_width.ceil().max(1.0) as u32;
    let height = layout.meta.canvas_height.ceil().max(1.0) as u32;
    let mut img = RgbaImage::from_pixel(width, height, Rgba([26, 27, 38, 255]));
    for (&index, rect) in &layout.frames {
        let color = PREVIEW_PALETTE[index % PREVIEW_PALETTE.len()];
        let x0 = rect.x.max(0.0) as u32;
        let y0 = rect.y.max(0.0) as u32;
        let x1 = ((rect.x + rect.w) as u32).min(width);
        let y1 = ((rect.y + rect.h) as u32).min(height);
        for y in y0..y1 {
            for x in x0..x1 {
                let edge = x == x0 || y == y0 || x + 1 == x1 || y + 1 == y1;
                let px = if edge { Rgba([26, 27, 38, 255]) } else { color };
                img.put_pixel(x, y, px);
            }
        }
    }
    img
}

#[derive(Serialize)]
struct HtmlFrame {
    index: usize,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

#[derive(Serialize)]
struct HtmlContext {
    canvas_width: f64,
    canvas_height: f64,
    scale: f64,
    placed: usize,
    total: usize,
    frames: Vec<HtmlFrame>,
}

fn build_html_context(layout: &Layout) -> HtmlContext {
    let frames = layout
        .frames
        .iter()
        .map(|(&index, rect)| HtmlFrame {
            index,
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
        })
        .collect();
    HtmlContext {
        canvas_width: layout.meta.canvas_width,
        canvas_height: layout.meta.canvas_height,
        scale: layout.meta.scale,
        placed: layout.frames.len(),
        total: layout.meta.num_items,
        frames,
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Serialize, Deserialize)]
struct ManifestItem {
    width: f64,
    height: f64,
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    canvas_width: Option<f64>,
    canvas_height: Option<f64>,
    columns: Option<usize>,
    rows: Option<usize>,
    spacing: Option<f64>,
    outer_gutters: Option<bool>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_mosaic_config(self, mut cfg: MosaicConfig) -> MosaicConfig {
        if let Some(v) = self.canvas_width {
            cfg.canvas_width = v;
        }
        if let Some(v) = self.canvas_height {
            cfg.canvas_height = v;
        }
        if let Some(v) = self.columns {
            cfg.columns = v;
        }
        if let Some(v) = self.rows {
            cfg.rows = v;
        }
        if let Some(v) = self.spacing {
            cfg.spacing = v;
        }
        if let Some(v) = self.outer_gutters {
            cfg.outer_gutters = v;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        cfg
    }
}
