use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;

use crate::config::Config;
use crate::render::{render_group_day, render_teacher_week};
use crate::schedule::ingest::{render_preview, PREVIEW_MAX_COLS, PREVIEW_MAX_ROWS};
use crate::schedule::{Day, ScheduleIngestor, ScheduleSnapshot, ScheduleStats, ScheduleStore};
use crate::server;
use crate::sheet::load_grid;

const USAGE: &str = "usage: timetable <serve|import|inspect|group|teacher>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Import,
    Inspect,
    Group,
    Teacher,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("import") => Some(Command::Import),
        Some("inspect") => Some(Command::Inspect),
        Some("group") => Some(Command::Group),
        Some("teacher") => Some(Command::Teacher),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };
    match command {
        Command::Serve => handle_serve(config),
        Command::Import => handle_import(args, &config),
        Command::Inspect => handle_inspect(args),
        Command::Group => handle_group(args, &config),
        Command::Teacher => handle_teacher(args, &config),
    }
}

fn handle_serve(config: Config) -> i32 {
    let store = Arc::new(ScheduleStore::new(ScheduleIngestor::new(config.preview_path.clone())));
    if let Err(err) = store.load_latest_from_dir(&config.data_dir) {
        eprintln!("starting without a schedule: {err}");
    }
    match server::run_server(config, store) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

#[derive(Debug, Serialize)]
struct ImportReport {
    source_path: String,
    #[serde(flatten)]
    stats: ScheduleStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_path: Option<String>,
}

fn handle_import(args: &[String], config: &Config) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: timetable import <path-to-workbook>");
        return 2;
    };
    let ingestor = ScheduleIngestor::new(config.preview_path.clone());
    let rows = match ingestor.ingest_file(Path::new(path)) {
        Ok(rows) => rows,
        Err(err) => {
            eprintln!("import failed: {err}");
            return 1;
        }
    };

    let snapshot = ScheduleSnapshot::build(rows);
    let report = ImportReport {
        source_path: path.clone(),
        stats: snapshot.stats(),
        preview_path: snapshot
            .is_empty()
            .then(|| config.preview_path.display().to_string()),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize import report: {err}");
            1
        }
    }
}

fn handle_inspect(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: timetable inspect <path-to-workbook> [rows]");
        return 2;
    };
    let rows = parse_usize_arg(args.get(3), "rows", PREVIEW_MAX_ROWS);
    match load_grid(Path::new(path)) {
        Ok(grid) => {
            print!("{}", render_preview(&grid, rows, PREVIEW_MAX_COLS));
            0
        }
        Err(err) => {
            eprintln!("inspect failed: {err}");
            1
        }
    }
}

fn handle_group(args: &[String], config: &Config) -> i32 {
    let (Some(path), Some(group), Some(day)) = (args.get(2), args.get(3), args.get(4)) else {
        eprintln!("usage: timetable group <path-to-workbook> <group> <day>");
        return 2;
    };
    let day = match day.parse::<Day>() {
        Ok(day) => day,
        Err(err) => {
            eprintln!("{err}");
            return 2;
        }
    };
    match load_snapshot(path, config) {
        Some(snapshot) => {
            println!("{}", render_group_day(&snapshot, group, day));
            0
        }
        None => 1,
    }
}

fn handle_teacher(args: &[String], config: &Config) -> i32 {
    let (Some(path), Some(name)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: timetable teacher <path-to-workbook> <name>");
        return 2;
    };
    match load_snapshot(path, config) {
        Some(snapshot) => {
            let today = Local::now().date_naive();
            println!("{}", render_teacher_week(&snapshot, name, today));
            0
        }
        None => 1,
    }
}

fn load_snapshot(path: &str, config: &Config) -> Option<ScheduleSnapshot> {
    match ScheduleIngestor::new(config.preview_path.clone()).ingest_file(Path::new(path)) {
        Ok(rows) => Some(ScheduleSnapshot::build(rows)),
        Err(err) => {
            eprintln!("failed to load {path}: {err}");
            None
        }
    }
}

fn parse_usize_arg(raw: Option<&String>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
