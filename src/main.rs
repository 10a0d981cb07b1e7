use clap::Parser;
use roundcorner::ufo::MasterPair;
use roundcorner::PolicyTable;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roundcorner", about = "Round the corners of a two-master UFO font")]
struct Cli {
    /// Light master UFO
    #[arg(long)]
    light: PathBuf,

    /// Heavy master UFO
    #[arg(long)]
    heavy: PathBuf,

    /// Output path for the light master (defaults to overwriting --light)
    #[arg(long)]
    out_light: Option<PathBuf>,

    /// Output path for the heavy master (defaults to overwriting --heavy)
    #[arg(long)]
    out_heavy: Option<PathBuf>,

    /// Radius policy file (TOML)
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Base radius for the light master (overrides the policy default)
    #[arg(long)]
    light_radius: Option<f64>,

    /// Base radius for the heavy master (overrides the policy default)
    #[arg(long)]
    heavy_radius: Option<f64>,

    /// Radius for concave corners (overrides the policy default)
    #[arg(long)]
    inner_radius: Option<f64>,

    /// Only round these glyphs (repeatable)
    #[arg(short, long = "glyph")]
    glyphs: Vec<String>,

    /// Log per-glyph details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut table = match &cli.policy {
        Some(path) => PolicyTable::load(path)?,
        None => PolicyTable::default(),
    };
    if let Some(r) = cli.light_radius {
        table.radius.light = r;
    }
    if let Some(r) = cli.heavy_radius {
        table.radius.heavy = r;
    }
    if let Some(r) = cli.inner_radius {
        table.radius.inner = r;
    }
    table.validate()?;

    let t_start = Instant::now();
    let mut masters = MasterPair::load(&cli.light, &cli.heavy)?;
    let outlines = masters.outlines(&cli.glyphs);
    eprintln!(
        "  Load        {} glyphs  (radius {}/{}, inner {})",
        outlines.len(),
        table.radius.light,
        table.radius.heavy,
        table.radius.inner,
    );

    let (rounded, stats) = roundcorner::round_glyphs_with_stats(&outlines, &table, &table.engine);
    eprintln!(
        "  Round       {} contours rounded \u{00b7} {} untouched \u{00b7} {} fillets",
        stats.contours_rounded, stats.contours_untouched, stats.fillets,
    );

    masters.apply(&rounded);
    let out_light = cli.out_light.as_ref().unwrap_or(&cli.light);
    let out_heavy = cli.out_heavy.as_ref().unwrap_or(&cli.heavy);
    masters.save(out_light, out_heavy)?;

    eprintln!(
        "  \u{2713} {} \u{00b7} {}  ({}ms)",
        out_light.display(),
        out_heavy.display(),
        t_start.elapsed().as_millis(),
    );
    Ok(())
}
