#![warn(clippy::uninlined_format_args)]

mod config;
mod input;

use std::{borrow::Cow, env, fs, process};

use config::RunConfig;
use equipart_model::{Assignment, PartitionOptions, default_backend, partition_with};
use input::{Instance, parse_instance};

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let mut args = env::args().skip(1);
    let (Some(path), Some(k)) = (args.next(), args.next()) else {
        return Err("Usage: equipart <sizes-file> <k>".into());
    };
    let k: usize = k
        .parse()
        .map_err(|_| format!("Group count must be a positive integer (got '{k}')"))?;

    let source =
        fs::read_to_string(&path).map_err(|err| format!("Failed to read '{path}': {err}"))?;
    let Instance { sizes, labels } = parse_instance(&source)?;
    let config = RunConfig::from_env()?;

    let mut options = PartitionOptions::default()
        .with_strict(config.strict)
        .with_balance_weight(config.balance_weight);
    if let Some(labels) = labels {
        options = options.with_labels(labels);
    }

    tracing::info!(
        "Partitioning {} sizes into {k} groups ({})",
        sizes.len(),
        config.objective
    );
    let assignment = partition_with(
        config.objective,
        &sizes,
        k,
        &mut default_backend(),
        &options,
    )
    .map_err(|err| err.to_string())?;

    print!("{}", render(&sizes, &assignment));
    Ok(())
}

fn render(sizes: &[f64], assignment: &Assignment) -> String {
    let mut out = String::new();
    for (size, group) in sizes.iter().zip(assignment.iter()) {
        out.push_str(&format!("{size} -> {group}\n"));
    }
    for (idx, sum) in assignment.group_sums(sizes).iter().enumerate() {
        out.push_str(&format!("group {}: {sum}\n", idx + 1));
    }
    out.push_str(&format!("range: {}\n", assignment.range(sizes)));
    out
}
