use std::{
    fmt::Display,
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, TimeZone};
use tracing::info;

use crate::model::GameRecord;

pub const HEADER: &str = "player_move,opponent_move,outcome,was_random";

// Every field is a bare token, so nothing is quoted.
pub fn to_csv(history: &[GameRecord]) -> String {
    let mut out = String::with_capacity((history.len() + 1) * HEADER.len());
    out.push_str(HEADER);
    out.push('\n');
    for record in history {
        out.push_str(&format!(
            "{},{},{},{}\n",
            record.player_move, record.opponent_move, record.outcome, record.was_random
        ));
    }
    out
}

pub fn file_name<Tz: TimeZone>(exported_at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("rps-history-{}.csv", exported_at.format("%Y%m%d-%H%M%S"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryExport {
    pub file_name: String,
    pub contents: String,
}

impl HistoryExport {
    pub fn new<Tz: TimeZone>(history: &[GameRecord], exported_at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: Display,
    {
        HistoryExport {
            file_name: file_name(exported_at),
            contents: to_csv(history),
        }
    }

    pub fn write_to(&self, directory: &Path) -> io::Result<PathBuf> {
        let path = directory.join(&self.file_name);
        fs::write(&path, &self.contents)?;
        info!("Exported history to {:?}", path);
        Ok(path)
    }
}
