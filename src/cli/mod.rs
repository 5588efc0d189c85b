pub mod query;
pub mod report;

use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use query::QueryArgs;
use report::{
    write_daily, write_goals, write_json, write_log, write_rules, write_summary, GoalReport,
    SummaryReport,
};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    analysis::{
        category::Category, dashboard::Dashboard, goals::GoalKind, insights::event_log,
        rules::Rules, Snapshot,
    },
    config::load_rules,
    source::{export::ExportDirSource, DateWindow},
    utils::{
        dir::create_application_default_path, logging::enable_logging, percentage::Percentage,
    },
};

/// Name of the directory inside of the state directory that calendar exports are read from.
pub const EVENTS_DIR: &str = "events";

#[derive(Parser, Debug)]
#[command(name = "calsight", version, long_about = None)]
#[command(about = "Breaks calendar time down into work, study and life", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[command(flatten)]
    query: QueryArgs,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Hours per category, category ranking and subcategories")]
    Summary {},
    #[command(about = "Hours per category for every day")]
    Daily {},
    #[command(about = "Daily coding, study and sport goals")]
    Goals {
        #[arg(long = "goal", help = "Goals to show. All of them by default")]
        kinds: Vec<GoalKind>,
        #[arg(
            long,
            default_value = "80",
            help = "Share of days a goal has to be met on to be considered on track"
        )]
        threshold: Percentage,
    },
    #[command(about = "Events grouped by category and subcategory")]
    Log {
        #[arg(long, help = "Only show a single category")]
        category: Option<Category>,
    },
    #[command(about = "Print the rules in use in the rule file format")]
    Rules {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let state_dir = create_application_default_path()?;
    enable_logging(&state_dir, logging_level, args.log)?;

    let rules = load_rules(args.query.rules.as_deref()).await?;
    if let Commands::Rules {} = args.commands {
        let mut out = io::stdout().lock();
        return if args.query.json {
            write_json(&mut out, &rules)
        } else {
            write_rules(&mut out, &rules)
        };
    }

    let window = args.query.window()?;
    let export_dir = args
        .query
        .events
        .clone()
        .unwrap_or_else(|| state_dir.join(EVENTS_DIR));
    info!(
        "Reading events from {export_dir:?} between {} and {}",
        window.start, window.end
    );

    let source = ExportDirSource::new(export_dir);
    let mut dashboard = Dashboard::new(rules, !args.query.include_holidays);
    let snapshot = dashboard
        .refresh(&source, &args.query.calendars, window)
        .await?;

    print_report(
        &mut io::stdout().lock(),
        args.commands,
        &snapshot,
        dashboard.rules(),
        window,
        args.query.json,
    )
}

fn print_report(
    out: &mut impl Write,
    command: Commands,
    snapshot: &Snapshot,
    rules: &Rules,
    window: DateWindow,
    json: bool,
) -> Result<()> {
    match command {
        Commands::Summary {} => {
            let report = SummaryReport::new(
                snapshot,
                window.start.date_naive(),
                window.end.date_naive(),
            );
            if json {
                write_json(out, &report)
            } else {
                write_summary(out, &report)
            }
        }
        Commands::Daily {} => {
            let daily = &snapshot.analysis.daily_breakdown;
            if json {
                write_json(out, daily)
            } else {
                write_daily(out, daily)
            }
        }
        Commands::Goals { kinds, threshold } => {
            let report = GoalReport::new(&snapshot.goals, &kinds, threshold);
            if json {
                write_json(out, &report)
            } else {
                write_goals(out, &report)
            }
        }
        Commands::Log { category } => {
            let mut log = event_log(&snapshot.analysis, &rules.table);
            if let Some(category) = category {
                log.retain(|v| v.category == category);
            }
            if json {
                write_json(out, &log)
            } else {
                write_log(out, &log)
            }
        }
        Commands::Rules {} => write_rules(out, rules),
    }
}
