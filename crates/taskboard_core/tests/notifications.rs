use chrono::{Duration, NaiveDate};
use taskboard_core::{
    generate_notifications, ColumnId, NotificationKind, Priority, Task, TaskNotification,
};
use uuid::Uuid;

const NOW_MS: i64 = 1_736_500_000_000;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

fn task_due_in(days: i64, column: ColumnId) -> Task {
    let deadline = today() + Duration::days(days);
    task_with_deadline(&deadline.format("%Y-%m-%d").to_string(), column)
}

fn task_with_deadline(deadline: &str, column: ColumnId) -> Task {
    Task {
        id: Uuid::new_v4(),
        title: "Write report".to_string(),
        description: String::new(),
        priority: Priority::High,
        deadline: deadline.to_string(),
        completed: false,
        column_id: column,
    }
}

fn existing(task: &Task, kind: NotificationKind) -> TaskNotification {
    TaskNotification {
        id: Uuid::new_v4(),
        task_id: task.id,
        title: "Earlier".to_string(),
        message: "earlier".to_string(),
        kind,
        deadline: task.deadline.clone(),
        read: true,
        created_at: NOW_MS - 1,
    }
}

#[test]
fn due_today_emits_one_today_notification() {
    let task = task_due_in(0, ColumnId::pending());

    let report = generate_notifications([&task], &[], today(), NOW_MS);

    assert_eq!(report.notifications.len(), 1);
    let notification = &report.notifications[0];
    assert_eq!(notification.kind, NotificationKind::Today);
    assert_eq!(notification.task_id, task.id);
    assert_eq!(notification.title, "Task Due Today");
    assert_eq!(notification.message, "\"Write report\" is due today!");
    assert_eq!(notification.deadline, task.deadline);
    assert_eq!(notification.created_at, NOW_MS);
    assert!(!notification.read);
}

#[test]
fn existing_pair_suppresses_repeat() {
    let task = task_due_in(0, ColumnId::pending());
    let feed = vec![existing(&task, NotificationKind::Today)];
    assert!(feed[0].matches(task.id, NotificationKind::Today));

    let report = generate_notifications([&task], &feed, today(), NOW_MS);

    assert!(report.notifications.is_empty());
}

#[test]
fn offsets_between_thresholds_emit_nothing() {
    for days in [3, 4, 5, 6, 8, 30] {
        let task = task_due_in(days, ColumnId::pending());
        let report = generate_notifications([&task], &[], today(), NOW_MS);
        assert!(report.is_empty(), "offset {days}");
    }
}

#[test]
fn done_tasks_never_notify() {
    let due_today = task_due_in(0, ColumnId::done());
    let overdue = task_due_in(-3, ColumnId::done());

    let report = generate_notifications([&due_today, &overdue], &[], today(), NOW_MS);

    assert!(report.notifications.is_empty());
}

#[test]
fn schedule_messages_match_each_threshold() {
    let cases = [
        (-1, NotificationKind::Overdue, "Overdue Task", "is overdue!"),
        (1, NotificationKind::Tomorrow, "Task Due Tomorrow", "is due tomorrow!"),
        (2, NotificationKind::Upcoming, "Upcoming Task", "is due in 2 days!"),
        (7, NotificationKind::Upcoming, "Upcoming Task", "is due in a week!"),
    ];
    for (days, kind, title, phrase) in cases {
        let task = task_due_in(days, ColumnId::processing());
        let report = generate_notifications([&task], &[], today(), NOW_MS);

        assert_eq!(report.notifications.len(), 1, "offset {days}");
        let notification = &report.notifications[0];
        assert_eq!(notification.kind, kind);
        assert_eq!(notification.title, title);
        assert_eq!(notification.message, format!("\"Write report\" {phrase}"));
    }
}

#[test]
fn overdue_is_emitted_once_however_late() {
    let task = task_due_in(-40, ColumnId::pending());

    let first = generate_notifications([&task], &[], today(), NOW_MS);
    assert_eq!(first.notifications.len(), 1);
    assert_eq!(first.notifications[0].kind, NotificationKind::Overdue);

    let later = today() + Duration::days(5);
    let second = generate_notifications([&task], &first.notifications, later, NOW_MS);
    assert!(second.notifications.is_empty());
}

#[test]
fn week_reminder_suppresses_two_day_reminder() {
    let task = task_due_in(7, ColumnId::pending());
    let week = generate_notifications([&task], &[], today(), NOW_MS);
    assert_eq!(week.notifications.len(), 1);

    let five_days_later = today() + Duration::days(5);
    let report = generate_notifications([&task], &week.notifications, five_days_later, NOW_MS);

    assert!(report.notifications.is_empty());
}

#[test]
fn each_day_of_the_countdown_adds_its_own_kind() {
    let task = task_due_in(1, ColumnId::pending());
    let mut feed = Vec::new();

    for day in [today(), today() + Duration::days(1), today() + Duration::days(2)] {
        let report = generate_notifications([&task], &feed, day, NOW_MS);
        feed.extend(report.notifications);
    }

    let kinds: Vec<_> = feed.iter().map(|item| item.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NotificationKind::Tomorrow,
            NotificationKind::Today,
            NotificationKind::Overdue
        ]
    );
}

#[test]
fn invalid_deadline_is_reported_and_others_still_processed() {
    let broken = task_with_deadline("next friday", ColumnId::pending());
    let valid = task_due_in(0, ColumnId::pending());

    let report = generate_notifications([&broken, &valid], &[], today(), NOW_MS);

    assert_eq!(report.invalid_dates.len(), 1);
    assert_eq!(report.invalid_dates[0].task_id, broken.id);
    assert_eq!(report.invalid_dates[0].value, "next friday");
    assert_eq!(report.notifications.len(), 1);
    assert_eq!(report.notifications[0].task_id, valid.id);
}

#[test]
fn datetime_deadlines_use_their_calendar_date() {
    let task = task_with_deadline("2025-01-11T23:30:00Z", ColumnId::pending());

    let report = generate_notifications([&task], &[], today(), NOW_MS);

    assert_eq!(report.notifications.len(), 1);
    assert_eq!(report.notifications[0].kind, NotificationKind::Tomorrow);
}

#[test]
fn repeated_task_in_one_pass_is_emitted_once() {
    let task = task_due_in(0, ColumnId::pending());

    let report = generate_notifications([&task, &task], &[], today(), NOW_MS);

    assert_eq!(report.notifications.len(), 1);
}

#[test]
fn notifications_follow_input_task_order() {
    let first = task_due_in(0, ColumnId::pending());
    let second = task_due_in(-2, ColumnId::processing());

    let report = generate_notifications([&first, &second], &[], today(), NOW_MS);

    let tasks: Vec<_> = report.notifications.iter().map(|item| item.task_id).collect();
    assert_eq!(tasks, vec![first.id, second.id]);
}

#[test]
fn notification_serializes_kind_as_type() {
    let task = task_due_in(0, ColumnId::pending());
    let report = generate_notifications([&task], &[], today(), NOW_MS);

    let json = serde_json::to_value(&report.notifications[0]).unwrap();
    assert_eq!(json["type"], "today");
    assert_eq!(json["read"], false);
}
