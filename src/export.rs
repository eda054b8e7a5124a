use chrono::SecondsFormat;
use serde::Serialize;
use std::io::Write;

use crate::progress::ModuleProgress;

#[derive(Debug, Serialize)]
struct Row<'a> {
    id: &'a str,
    completed: bool,
    progress: i32,
    quiz_score: Option<u32>,
    last_accessed: Option<String>,
}

/// Writes one CSV row per module, header first
pub fn write_csv<W: Write>(modules: &[ModuleProgress], out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for m in modules {
        writer.serialize(Row {
            id: &m.id,
            completed: m.completed,
            progress: m.progress,
            quiz_score: m.quiz_score,
            last_accessed: m
                .last_accessed
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn writes_header_and_rows() {
        let mut done = ModuleProgress::new("tawaf");
        done.completed = true;
        done.progress = 100;
        done.quiz_score = Some(80);
        done.last_accessed = Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap());

        let mut out = Vec::new();
        write_csv(&[ModuleProgress::new("intro"), done], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,completed,progress,quiz_score,last_accessed");
        assert_eq!(lines[1], "intro,false,0,,");
        assert_eq!(lines[2], "tawaf,true,100,80,2025-06-01T09:00:00.000Z");
    }
}
