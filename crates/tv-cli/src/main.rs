//! trigger-comparison CLI

mod inputs;
mod paths;
mod pipeline;

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tv_core::CorrelationMode;
use tv_stats::BinContent;
use tv_viz_render::config::resolve_config;
use tv_viz_render::output::OutputFormat;

const EXAMPLE: &str =
    "Example: trigger-comparison -File1=run1/validation.root -File2=run2/validation.root";

#[derive(Parser, Debug)]
#[command(name = "trigger-comparison")]
#[command(about = "Compare trigger efficiencies and object distributions of two validation files")]
#[command(version)]
#[command(after_help = EXAMPLE)]
struct Cli {
    /// First (reference) input file, `.root` or `.json` bundle
    #[arg(long)]
    file1: Option<PathBuf>,

    /// Second input file, `.root` or `.json` bundle
    #[arg(long)]
    file2: Option<PathBuf>,

    /// Combined results file (pretty JSON)
    #[arg(long, default_value = "trigger_validation.json")]
    output_file: PathBuf,

    /// Treat the two inputs as fully correlated when combining uncertainties
    #[arg(long)]
    correlated: bool,

    /// Name L1 compatibility summaries with the legacy `_A` suffix instead of `_L1`
    #[arg(long, alias = "oldL1names")]
    old_l1_names: bool,

    /// Directory for images, log files and compatibility.json
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Image format (svg, png)
    #[arg(long, default_value = "svg")]
    format: OutputFormat,

    /// Minimum efficiency, in both inputs, for a path's distributions to be compared
    #[arg(long, default_value_t = 0.3)]
    eff_threshold: f64,

    /// How trigger-bits bin contents are read (auto, counts, efficiencies)
    #[arg(long, default_value = "auto")]
    bin_content: BinContent,

    /// Legend label of the first input. Defaults to its run directory or file stem.
    #[arg(long)]
    label1: Option<String>,

    /// Legend label of the second input. Defaults to its run directory or file stem.
    #[arg(long)]
    label2: Option<String>,

    /// Rendering config (YAML)
    #[arg(long)]
    viz_config: Option<PathBuf>,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

/// Rewrite the single-dash spellings (`-File1=a.root`, `-help`) into clap's.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    const LEGACY: [(&str, &str); 3] =
        [("-File1=", "--file1="), ("-File2=", "--file2="), ("-OutputFile=", "--output-file=")];

    args.into_iter()
        .map(|arg| {
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "-help" {
                return OsString::from("--help");
            }
            for (old, new) in LEGACY {
                if let Some(value) = s.strip_prefix(old) {
                    return OsString::from(format!("{new}{value}"));
                }
            }
            arg
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let (Some(file1), Some(file2)) = (cli.file1.clone(), cli.file2.clone()) else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };
    let opts = build_options(cli, file1, file2)?;
    pipeline::run(&opts)?;
    Ok(())
}

fn build_options(cli: Cli, file1: PathBuf, file2: PathBuf) -> Result<pipeline::Options> {
    if !cli.format.is_available() {
        anyhow::bail!("output format {} requires building with the `png` feature", cli.format);
    }
    if !(0.0..=1.0).contains(&cli.eff_threshold) {
        anyhow::bail!("--eff-threshold must be within [0, 1], got {}", cli.eff_threshold);
    }

    let viz = match &cli.viz_config {
        Some(path) => {
            let yaml = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            resolve_config(Some(&yaml))
                .with_context(|| format!("invalid render config {}", path.display()))?
        }
        None => resolve_config(None)?,
    };

    let labels = [
        cli.label1.unwrap_or_else(|| paths::dataset_label(&file1)),
        cli.label2.unwrap_or_else(|| paths::dataset_label(&file2)),
    ];
    let correlation =
        if cli.correlated { CorrelationMode::Correlated } else { CorrelationMode::Uncorrelated };

    Ok(pipeline::Options {
        inputs: [file1, file2],
        labels,
        output_file: cli.output_file,
        output_dir: cli.output_dir,
        correlation,
        old_l1_names: cli.old_l1_names,
        bin_content: cli.bin_content,
        eff_threshold: cli.eff_threshold,
        format: cli.format,
        viz,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("trigger-comparison").chain(args.iter().copied());
        Cli::try_parse_from(normalize_args(argv.map(OsString::from))).unwrap()
    }

    #[test]
    fn legacy_spellings() {
        let cli = parse(&[
            "-File1=run1/validation.root",
            "-File2=run2/validation.root",
            "-OutputFile=out.json",
            "--correlated",
            "--oldL1names",
        ]);
        assert_eq!(cli.file1.as_deref(), Some(std::path::Path::new("run1/validation.root")));
        assert_eq!(cli.output_file, PathBuf::from("out.json"));
        assert!(cli.correlated);
        assert!(cli.old_l1_names);
    }

    #[test]
    fn defaults() {
        let cli = parse(&["--file1", "a.json", "--file2", "b.json"]);
        assert_eq!(cli.output_file, PathBuf::from("trigger_validation.json"));
        assert_eq!(cli.eff_threshold, 0.3);
        assert_eq!(cli.bin_content, BinContent::Auto);
        assert_eq!(cli.format, OutputFormat::Svg);

        let opts = build_options(cli, "run1/a.json".into(), "b.json".into()).unwrap();
        assert_eq!(opts.labels, ["run1".to_string(), "b".to_string()]);
        assert_eq!(opts.correlation, CorrelationMode::Uncorrelated);
    }

    #[test]
    fn help_is_rewritten() {
        let args = normalize_args(["x", "-help"].map(OsString::from));
        assert_eq!(args[1], "--help");
    }

    #[test]
    fn bad_threshold_is_rejected() {
        let cli = parse(&["--file1=a.json", "--file2=b.json", "--eff-threshold=1.5"]);
        assert!(build_options(cli, "a.json".into(), "b.json".into()).is_err());
    }
}
