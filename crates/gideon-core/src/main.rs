use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use gideon_core::{ResolveError, SpecError, Task, Test, TestConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn spec_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("defaults")
                .long("defaults")
                .default_value(gideon_core::runner::DEFAULTS_FILE)
                .value_parser(value_parser!(PathBuf))
                .help("Document the system defaults are read from"),
        )
        .arg(
            Arg::new("base")
                .long("base")
                .value_parser(value_parser!(PathBuf))
                .help("Base document (defaults to the defaults document)"),
        )
        .arg(
            Arg::new("spec")
                .default_value(gideon_core::runner::SPEC_FILE)
                .value_parser(value_parser!(PathBuf))
                .help("Test specification document"),
        )
}

fn cli() -> Command {
    Command::new("gideon")
        .version(gideon_core::VERSION)
        .about("Resolve and run Gideon workload/phase test specifications")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level unless RUST_LOG is set"),
        )
        .subcommand(spec_args(Command::new("run").about("Link and run every phase of a test")))
        .subcommand(spec_args(
            Command::new("plan").about("Link a test and print its phase/task graph"),
        ))
        .subcommand(spec_args(
            Command::new("resolve")
                .about("Resolve one directive and print it as JSON")
                .arg(
                    Arg::new("path")
                        .long("path")
                        .required(true)
                        .help("Dotted directive path, e.g. workloads.SetOnly"),
                ),
        ))
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn path_arg(args: &ArgMatches, name: &str) -> Option<PathBuf> {
    args.get_one::<PathBuf>(name).cloned()
}

fn config_from(args: &ArgMatches) -> Result<TestConfig> {
    let spec = path_arg(args, "spec").context("missing test specification path")?;
    let mut config = TestConfig::new(spec);
    if let Some(defaults) = path_arg(args, "defaults") {
        config = config.with_defaults(defaults);
    }
    if let Some(base) = path_arg(args, "base") {
        config = config.with_base(base);
    }
    Ok(config)
}

fn load(args: &ArgMatches) -> Result<Test> {
    let config = config_from(args)?;
    Test::load(&config).with_context(|| {
        format!(
            "failed to load test {} (defaults {}, base {})",
            config.spec_path.display(),
            config.defaults_path.display(),
            config.base_path().display()
        )
    })
}

fn describe(err: &SpecError) -> String {
    match err.offending_path() {
        Some(path) => format!("{err} (at {path})"),
        None => err.to_string(),
    }
}

fn run(args: &ArgMatches) -> Result<()> {
    let mut test = load(args)?;
    let summary = test.run().map_err(|err| anyhow::anyhow!(describe(&err)))?;
    println!(
        "{}: {} phases, {} tasks run",
        test.name(),
        summary.phases,
        summary.tasks
    );
    Ok(())
}

fn plan(args: &ArgMatches) -> Result<()> {
    let mut test = load(args)?;
    test.link().map_err(|err| anyhow::anyhow!(describe(&err)))?;

    println!("{}", test.name());
    for (name, phase) in test.phases() {
        println!("  {name} (runtime {}s)", phase.runtime);
        for (path, task) in phase.tasks() {
            match task {
                Task::Workload(w) => println!(
                    "    {path}: set={} get={} delete={} update={} expire={} ttl={} opRate={}",
                    w.set, w.get, w.delete, w.update, w.expire, w.ttl, w.op_rate
                ),
                Task::Phase(p) => println!("    {path}: phase with {} tasks", p.tasks().len()),
            }
        }
    }
    Ok(())
}

fn resolve(args: &ArgMatches) -> Result<()> {
    let test = load(args)?;
    let path = args
        .get_one::<String>("path")
        .context("missing --path argument")?;

    match test.resolver().resolve(path) {
        Ok(directive) => {
            println!("{}", serde_json::to_string_pretty(&directive)?);
            Ok(())
        }
        Err(err @ ResolveError::MissingDirective { .. }) => {
            if let Some(partial) = err.partial() {
                println!("{}", serde_json::to_string_pretty(partial)?);
            }
            Err(anyhow::anyhow!("{err} (while resolving {path})"))
        }
        Err(err) => Err(err).with_context(|| format!("failed to resolve {path}")),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    let Some((command, args)) = matches.subcommand() else {
        eprintln!("error: no subcommand given");
        return ExitCode::FAILURE;
    };
    init_tracing(args.get_flag("verbose"));

    let outcome = match command {
        "run" => run(args),
        "plan" => plan(args),
        "resolve" => resolve(args),
        other => Err(anyhow::anyhow!("unknown subcommand {other}")),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn run_uses_default_file_names() {
        let matches = cli().try_get_matches_from(["gideon", "run"]).unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let config = config_from(args).unwrap();
        assert_eq!(config, TestConfig::default());
    }

    #[test]
    fn resolve_requires_path() {
        assert!(cli().try_get_matches_from(["gideon", "resolve", "spec.toml"]).is_err());
        let matches = cli()
            .try_get_matches_from(["gideon", "resolve", "--path", "workloads.a", "-v", "spec.toml"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(args.get_flag("verbose"));
        assert_eq!(args.get_one::<String>("path").unwrap(), "workloads.a");
    }
}
