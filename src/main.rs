use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{arg, ArgMatches, Command};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use u_assign::config::AssignConfig;
use u_assign::exact::SolveOutcome;
use u_assign::heuristic::{AssignmentKpi, HeuristicSolver, DEFAULT_SEED};
use u_assign::io::{
    read_assignments_from_path, read_groups_from_path, write_assignments,
    write_assignments_to_path,
};
use u_assign::models::{Instance, Solution};
use u_assign::validation::{check_feasibility, validate_input, FeasibilityReport};

fn cli() -> Command {
    Command::new("u-assign")
        .about("Assigns groups to capacity-bounded slots")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Builds an assignment with the heuristic pipeline")
                .arg(arg!(<GROUPS> "Group CSV file").value_parser(clap::value_parser!(PathBuf)))
                .arg(
                    arg!(--output [PATH] "Assignment CSV to write (stdout if omitted)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--config [PATH] "JSON configuration file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(arg!(--min [N] "Minimum occupancy per slot").value_parser(clap::value_parser!(u32)))
                .arg(arg!(--max [N] "Maximum occupancy per slot").value_parser(clap::value_parser!(u32)))
                .arg(
                    arg!(--"max-passes" [N] "Upper bound on local-search passes")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--retries [N] "Reshuffled constructions after an infeasible one")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--seed [N] "Seed for retry shuffles")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("evaluate")
                .about("Checks and prices an existing assignment")
                .arg(arg!(<GROUPS> "Group CSV file").value_parser(clap::value_parser!(PathBuf)))
                .arg(
                    arg!(<ASSIGNMENTS> "Assignment CSV file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--config [PATH] "JSON configuration file")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(sub_m),
        Some(("evaluate", sub_m)) => evaluate(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn solve(sub_m: &ArgMatches) -> Result<()> {
    let mut config = load_config(sub_m.get_one::<PathBuf>("config"))?;
    if let Some(&min) = sub_m.get_one::<u32>("min") {
        config.min_occupancy = min;
    }
    if let Some(&max) = sub_m.get_one::<u32>("max") {
        config.max_occupancy = max;
    }
    if let Some(&passes) = sub_m.get_one::<usize>("max-passes") {
        config.max_passes = passes;
    }
    config.validate().context("Invalid occupancy bounds")?;

    let instance = load_instance(required::<PathBuf>(sub_m, "GROUPS")?, &config)?;

    let solver = HeuristicSolver::new(config.clone())
        .with_retries(sub_m.get_one::<usize>("retries").copied().unwrap_or(0))
        .with_seed(sub_m.get_one::<u64>("seed").copied().unwrap_or(DEFAULT_SEED));
    let outcome = SolveOutcome::from_heuristic(solver.solve(&instance));

    match outcome {
        SolveOutcome::Feasible { solution, cost, .. } => {
            log_kpi(&solution, &instance, &config);
            info!(
                total = cost.total(),
                preference = cost.preference,
                accounting = cost.accounting,
                "Feasible assignment found"
            );
            match sub_m.get_one::<PathBuf>("output") {
                Some(path) => write_assignments_to_path(path, &solution)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => write_assignments(io::stdout().lock(), &solution)?,
            }
            Ok(())
        }
        SolveOutcome::HeuristicInfeasible { report, .. } => {
            log_violations(&report);
            bail!(
                "No feasible assignment found ({} violations); try --retries or another --seed",
                report.violations.len()
            )
        }
        SolveOutcome::ModelInfeasible => bail!("Problem has no feasible assignment"),
    }
}

fn evaluate(sub_m: &ArgMatches) -> Result<()> {
    let config = load_config(sub_m.get_one::<PathBuf>("config"))?;
    let instance = load_instance(required::<PathBuf>(sub_m, "GROUPS")?, &config)?;

    let path = required::<PathBuf>(sub_m, "ASSIGNMENTS")?;
    let assignments = read_assignments_from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let solution = Solution::from_assignments(&instance, config.slots, &assignments)
        .context("Assignment does not match the groups")?;

    let kpi = log_kpi(&solution, &instance, &config);
    println!("{}", serde_json::to_string_pretty(&kpi)?);

    let report = check_feasibility(&solution, &config);
    if !report.is_feasible() {
        log_violations(&report);
        bail!("Assignment is infeasible ({} violations)", report.violations.len());
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<AssignConfig> {
    match path {
        Some(path) => AssignConfig::from_path(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(AssignConfig::default()),
    }
}

fn load_instance(path: &Path, config: &AssignConfig) -> Result<Instance> {
    let instance = read_groups_from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if let Err(errors) = validate_input(&instance, config) {
        for e in &errors {
            error!(kind = ?e.kind, "{}", e.message);
        }
        bail!("Input validation failed with {} errors", errors.len());
    }
    Ok(instance)
}

fn log_kpi(solution: &Solution, instance: &Instance, config: &AssignConfig) -> AssignmentKpi {
    let kpi = AssignmentKpi::calculate(solution, instance, config);
    info!(
        total = kpi.cost.total(),
        preference = kpi.cost.preference,
        accounting = kpi.cost.accounting,
        "Cost breakdown"
    );
    info!(
        histogram = ?kpi.rank_histogram,
        avg_rank = kpi.avg_rank,
        min_occupancy = kpi.min_occupancy,
        max_occupancy = kpi.max_occupancy,
        "Rank histogram"
    );
    kpi
}

fn log_violations(report: &FeasibilityReport) {
    for v in &report.violations {
        warn!("{}", v.message);
    }
}

fn required<'a, T>(sub_m: &'a ArgMatches, name: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    sub_m
        .get_one::<T>(name)
        .ok_or_else(|| anyhow!("Missing argument {name}"))
}
