use chrono::{NaiveDate, Weekday};
use tasktrack_core::db::open_db_in_memory;
use tasktrack_core::{
    CompletionRecord, InMemoryTopicRepository, Period, PeriodPreset, RecurrenceRule,
    SqliteTopicRepository, StatisticsService, TaskAggregate, TaskPriority, TopicAggregate,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fitness_topic() -> TopicAggregate {
    // Wednesday 2024-05-15 is the reference day in these tests.
    let run = TaskAggregate::new("run")
        .with_priority(TaskPriority::High)
        .with_rule(RecurrenceRule::weekly(Weekday::Mon))
        .with_rule(RecurrenceRule::weekly(Weekday::Wed))
        .with_completion(CompletionRecord::on(date(2024, 5, 13)))
        .with_completion(CompletionRecord::on(date(2024, 4, 29)))
        .with_completion(CompletionRecord::on(date(2023, 12, 31)));
    let swim = TaskAggregate::new("swim").with_rule(RecurrenceRule::weekly(Weekday::Wed));
    TopicAggregate::new("Fitness")
        .with_color("orange")
        .with_task(run)
        .with_task(swim)
}

#[test]
fn presets_resolve_before_computing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTopicRepository::try_new(&conn).unwrap();
    repo.create_topic("alice", &fitness_topic()).unwrap();
    let service = StatisticsService::new(repo);
    let today = date(2024, 5, 15);

    let day = service
        .statistics_for_preset("alice", PeriodPreset::Today, today)
        .unwrap();
    assert_eq!(day[0].scheduled_count, 2);
    assert_eq!(day[0].completed_count, 0);

    let week = service
        .statistics_for_preset("alice", PeriodPreset::Week, today)
        .unwrap();
    // Mon 13 + Wed 15 for run, Wed 15 for swim.
    assert_eq!(week[0].task_statistics[0].scheduled_count, 2);
    assert_eq!(week[0].task_statistics[0].completed_count, 1);
    assert_eq!(week[0].task_statistics[1].scheduled_count, 1);
    assert_eq!(week[0].scheduled_count, 3);
    assert_eq!(week[0].completed_count, 1);

    let month = service
        .statistics_for_preset("alice", PeriodPreset::Month, today)
        .unwrap();
    // May 2024: 4 Mondays, 5 Wednesdays.
    assert_eq!(month[0].task_statistics[0].scheduled_count, 9);
    assert_eq!(month[0].task_statistics[0].completed_count, 1);
    assert_eq!(month[0].task_statistics[1].scheduled_count, 5);

    let year = service
        .statistics_for_preset("alice", PeriodPreset::Year, today)
        .unwrap();
    assert_eq!(year[0].task_statistics[0].completed_count, 2);
}

#[test]
fn explicit_period_matches_equivalent_preset() {
    let mut repo = InMemoryTopicRepository::new();
    repo.insert("bob", fitness_topic());
    let service = StatisticsService::new(&repo);

    let period = Period::new(date(2024, 5, 13), date(2024, 5, 20)).unwrap();
    let explicit = service.statistics_for_period("bob", &period).unwrap();
    let preset = service
        .statistics_for_preset("bob", PeriodPreset::Week, date(2024, 5, 19))
        .unwrap();
    assert_eq!(explicit, preset);
}

#[test]
fn all_presets_share_one_snapshot() {
    let mut repo = InMemoryTopicRepository::new();
    repo.insert("carol", fitness_topic());
    let service = StatisticsService::new(repo);
    let today = date(2024, 5, 15);

    let reports = service.statistics_for_all_presets("carol", today).unwrap();
    let presets: Vec<_> = reports.iter().map(|report| report.preset).collect();
    assert_eq!(presets, PeriodPreset::ALL.to_vec());

    for report in &reports {
        let single = service
            .statistics_for_preset("carol", report.preset, today)
            .unwrap();
        assert_eq!(report.topics, single);
        assert_eq!(report.period, report.preset.period_for(today).unwrap());
    }
}

#[test]
fn due_tasks_skip_completed_work() {
    let mut repo = InMemoryTopicRepository::new();
    repo.insert("dave", fitness_topic());
    let service = StatisticsService::new(repo);

    // Monday: run is done already, swim is not scheduled.
    assert!(service.tasks_due_on("dave", date(2024, 5, 13)).unwrap().is_empty());

    // Wednesday: both are open.
    let due = service.tasks_due_on("dave", date(2024, 5, 15)).unwrap();
    let titles: Vec<_> = due.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["run", "swim"]);
    assert_eq!(due[0].priority, TaskPriority::High);
    assert_eq!(due[1].color.as_deref(), Some("orange"));
}

#[test]
fn unknown_user_yields_empty_report() {
    let service = StatisticsService::new(InMemoryTopicRepository::new());
    let report = service
        .statistics_for_preset("nobody", PeriodPreset::Month, date(2024, 5, 15))
        .unwrap();
    assert!(report.is_empty());
}
