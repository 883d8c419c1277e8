//! `tasktrack` command-line entry point.
//!
//! # Responsibility
//! - Open the configured database and print statistics or due tasks as JSON.
//! - List, create, edit and remove topics, tasks and completions.

use chrono::{Local, NaiveDate, NaiveDateTime, Weekday};
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use tasktrack_core::db::open_db;
use tasktrack_core::{
    init_logging, CompletionId, CoreConfig, Period, PeriodPreset, RecurrenceRule,
    SqliteTopicRepository, StatisticsService, TaskAggregate, TaskId, TaskPriority, TopicAggregate,
    TopicId, TopicRepository,
};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "tasktrack", version, about = "Recurring task statistics")]
struct Cli {
    /// TOML config file (db_path, log_level, log_dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides `db_path` from the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core version and exit
    Ping,
    /// Completion statistics per topic and task
    Stats(StatsArgs),
    /// Tasks scheduled and still open on a date
    Due {
        #[arg(long)]
        user: String,
        /// Defaults to the local date.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Topics with tasks, rules and completions, ids included
    Topics {
        #[arg(long)]
        user: String,
    },
    /// Create a topic
    AddTopic {
        #[arg(long)]
        user: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Create a task with its weekly schedule
    AddTask {
        #[arg(long)]
        topic: TopicId,
        #[arg(long)]
        title: String,
        /// Repeatable: --day mon --day wed
        #[arg(long = "day")]
        days: Vec<Weekday>,
        #[arg(long, value_parser = parse_priority, default_value = "normal")]
        priority: TaskPriority,
    },
    /// Replace a topic's title and color; omitting --color clears it
    EditTopic {
        #[arg(long)]
        topic: TopicId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Replace a task's title and priority; the schedule is kept
    EditTask {
        #[arg(long)]
        task: TaskId,
        #[arg(long)]
        title: String,
        #[arg(long, value_parser = parse_priority, default_value = "normal")]
        priority: TaskPriority,
    },
    /// Delete a topic with all of its tasks
    RmTopic {
        #[arg(long)]
        topic: TopicId,
    },
    /// Delete a task with its schedule and completions
    RmTask {
        #[arg(long)]
        task: TaskId,
    },
    /// Record a completion for a task
    Done {
        #[arg(long)]
        task: TaskId,
        /// Defaults to the local time.
        #[arg(long)]
        at: Option<NaiveDateTime>,
    },
    /// Delete a completion record
    Undo {
        #[arg(long)]
        completion: CompletionId,
    },
}

#[derive(Args)]
struct StatsArgs {
    #[arg(long)]
    user: String,
    /// today|week|month|year; ignored when --from/--to are given.
    #[arg(long, default_value = "week")]
    period: PeriodPreset,
    /// Reference date for the preset. Defaults to the local date.
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Emit all four presets computed from one snapshot.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    all: bool,
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    let mut config = match &cli.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    start_logging(&config);

    match cli.command {
        Commands::Ping => {
            println!("tasktrack_core version={}", tasktrack_core::core_version());
            Ok(())
        }
        command => run_with_db(&config, command),
    }
}

fn run_with_db(config: &CoreConfig, command: Commands) -> CliResult {
    let conn = open_db(&config.db_path)?;
    let repo = SqliteTopicRepository::try_new(&conn)?;

    match command {
        Commands::Ping => Ok(()),
        Commands::Stats(args) => run_stats(StatisticsService::new(repo), args),
        Commands::Due { user, date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let due = StatisticsService::new(repo).tasks_due_on(&user, date)?;
            print_json(&due)
        }
        Commands::Topics { user } => print_json(&repo.fetch_topics_for_user(&user)?),
        Commands::AddTopic { user, title, color } => {
            let mut topic = TopicAggregate::new(title);
            topic.color = color;
            let id = repo.create_topic(&user, &topic)?;
            println!("{id}");
            Ok(())
        }
        Commands::AddTask {
            topic,
            title,
            days,
            priority,
        } => {
            let mut task = TaskAggregate::new(title).with_priority(priority);
            task.rules = days.into_iter().map(RecurrenceRule::weekly).collect();
            let id = repo.create_task(topic, &task)?;
            println!("{id}");
            Ok(())
        }
        Commands::EditTopic {
            topic,
            title,
            color,
        } => Ok(repo.update_topic(topic, &title, color.as_deref())?),
        Commands::EditTask {
            task,
            title,
            priority,
        } => Ok(repo.update_task(task, &title, priority)?),
        Commands::RmTopic { topic } => Ok(repo.delete_topic(topic)?),
        Commands::RmTask { task } => Ok(repo.delete_task(task)?),
        Commands::Done { task, at } => {
            let at = at.unwrap_or_else(|| Local::now().naive_local());
            let id = repo.record_completion(task, Some(at))?;
            println!("{id}");
            Ok(())
        }
        Commands::Undo { completion } => {
            repo.delete_completion(completion)?;
            Ok(())
        }
    }
}

fn run_stats(service: StatisticsService<SqliteTopicRepository<'_>>, args: StatsArgs) -> CliResult {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    if args.all {
        return print_json(&service.statistics_for_all_presets(&args.user, today)?);
    }

    let report = match (args.from, args.to) {
        (Some(from), Some(to)) => {
            let period = Period::new(from, to)?;
            service.statistics_for_period(&args.user, &period)?
        }
        _ => service.statistics_for_preset(&args.user, args.period, today)?,
    };
    print_json(&report)
}

fn start_logging(config: &CoreConfig) {
    let Some(dir) = &config.log_dir else {
        return;
    };
    if let Err(err) = init_logging(config.log_level, dir) {
        eprintln!("warning: file logging disabled: {err}");
    }
}

fn parse_priority(value: &str) -> Result<TaskPriority, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(TaskPriority::Low),
        "normal" => Ok(TaskPriority::Normal),
        "high" => Ok(TaskPriority::High),
        other => Err(format!("unsupported priority `{other}`; expected low|normal|high")),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
