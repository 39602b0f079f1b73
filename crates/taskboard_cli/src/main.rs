//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskboard_core` wiring end to end: config, logging, database
//!   bootstrap, board load, notification refresh.
//! - Keep output line-oriented `key=value` pairs for quick sanity checks.

use std::error::Error;
use std::process::ExitCode;
use taskboard_core::db::{open_db, open_db_in_memory};
use taskboard_core::notify::today_local;
use taskboard_core::{
    core_version, init_logging, BoardService, CoreConfig, NotificationService,
    SqliteBoardRepository, SqliteNotificationRepository,
};

fn main() -> ExitCode {
    let config = CoreConfig::from_env();
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("taskboard logging disabled: {err}");
        }
    }

    println!("taskboard_core version={}", core_version());
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taskboard error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CoreConfig) -> Result<(), Box<dyn Error>> {
    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let board = BoardService::open(SqliteBoardRepository::try_new(&conn)?);
    let notifications = NotificationService::new(SqliteNotificationRepository::try_new(&conn)?);

    let report = notifications.refresh_now(board.board().tasks_ordered())?;
    let summary = board.summary(today_local());

    println!(
        "board restored={} tasks={} done={} in_progress={} urgent={} completion={:.0}%",
        board.restored(),
        summary.total,
        summary.completed,
        summary.in_progress,
        summary.urgent,
        summary.completion_rate
    );
    println!(
        "notifications new={} unread={} invalid_dates={}",
        report.notifications.len(),
        notifications.unread_count()?,
        report.invalid_dates.len()
    );
    Ok(())
}
