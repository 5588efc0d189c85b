use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use futures::{stream, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::ReadDirStream;
use tracing::{debug, error, instrument, warn};

use crate::analysis::event::{Event, EventTime};

use super::{calendar_matches, source_type_for_calendar, DateWindow, EventSource};

const UNTITLED: &str = "Untitled";
const CONCURRENT_READS: usize = 4;

/// Shape of a calendar export, the body of a Google Calendar `events.list` response.
#[derive(Debug, Deserialize)]
struct CalendarExport {
    summary: Option<String>,
    #[serde(default)]
    items: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    status: Option<String>,
    #[serde(default)]
    start: RawEventTime,
    #[serde(default)]
    end: RawEventTime,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEventTime {
    date_time: Option<String>,
    date: Option<String>,
}

impl RawEventTime {
    /// Values that fail to parse are dropped, which makes the event count as zero duration.
    fn normalize(self, event_id: &str) -> EventTime {
        let date_time = self.date_time.and_then(|v| {
            DateTime::parse_from_rfc3339(&v)
                .inspect_err(|e| warn!("Event {event_id} has illegal dateTime {v}: {e}"))
                .ok()
        });
        let date = self.date.and_then(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .inspect_err(|e| warn!("Event {event_id} has illegal date {v}: {e}"))
                .ok()
        });
        EventTime { date_time, date }
    }
}

/// [EventSource] reading a directory of calendar exports. Every `*.json` file in the directory
/// represents one calendar.
pub struct ExportDirSource {
    export_dir: PathBuf,
}

impl ExportDirSource {
    pub fn new(export_dir: PathBuf) -> Self {
        Self { export_dir }
    }

    async fn list_exports(&self) -> Result<Vec<PathBuf>> {
        let entries = match tokio::fs::read_dir(&self.export_dir).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Export directory {:?} doesn't exist", self.export_dir);
                return Ok(vec![]);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Can't read export directory {:?}", self.export_dir))
            }
        };

        let mut paths = ReadDirStream::new(entries)
            .filter_map(|entry| async move {
                entry
                    .inspect_err(|e| warn!("Skipping unreadable directory entry {e}"))
                    .ok()
                    .map(|v| v.path())
                    .filter(|v| v.extension().is_some_and(|ext| ext == "json"))
            })
            .collect::<Vec<_>>()
            .await;
        // directory order differs between platforms
        paths.sort();
        Ok(paths)
    }
}

async fn read_export(path: &Path) -> Result<CalendarExport> {
    debug!("Reading {path:?}");
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

fn calendar_name(export: &CalendarExport, path: &Path) -> String {
    export.summary.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_default()
    })
}

fn normalize_event(
    raw: RawEvent,
    index: usize,
    calendar: &str,
    source_type: &Arc<str>,
) -> Option<Event> {
    if raw
        .status
        .as_deref()
        .is_some_and(|v| v.eq_ignore_ascii_case("cancelled"))
    {
        return None;
    }
    let id = raw.id.unwrap_or_else(|| format!("{calendar}-{index}"));
    let start = raw.start.normalize(&id);
    let end = raw.end.normalize(&id);
    Some(Event {
        summary: raw.summary.unwrap_or_else(|| UNTITLED.into()).into(),
        description: raw.description.map(Into::into),
        start,
        end,
        source_type: source_type.clone(),
        id: id.into(),
    })
}

#[async_trait]
impl EventSource for ExportDirSource {
    #[instrument(skip(self))]
    async fn fetch_events(&self, calendars: &[String], window: DateWindow) -> Result<Vec<Event>> {
        let exports = self.list_exports().await?;

        let mut loaded = std::pin::pin!(stream::iter(exports)
            .map(|path| async move {
                let export = read_export(&path).await;
                (path, export)
            })
            .buffered(CONCURRENT_READS));

        let mut events = vec![];
        let mut matched_calendars = 0usize;
        while let Some((path, export)) = loaded.next().await {
            // One broken calendar shouldn't hide the others
            let export = match export {
                Ok(v) => v,
                Err(e) => {
                    error!("Failed to load calendar export {path:?}: {e:?}");
                    continue;
                }
            };
            let name = calendar_name(&export, &path);
            if !calendar_matches(&name, calendars) {
                debug!("Skipping calendar {name}");
                continue;
            }
            matched_calendars += 1;

            let source_type: Arc<str> = source_type_for_calendar(&name).into();
            let before = events.len();
            events.extend(
                export
                    .items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, raw)| normalize_event(raw, index, &name, &source_type))
                    .filter(|event| window.contains(event)),
            );
            debug!("Loaded {} events from {name}", events.len() - before);
        }

        if matched_calendars == 0 {
            warn!("No matching calendars found for names {calendars:?}");
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        analysis::event::test_events::at,
        source::{DateWindow, EventSource},
        utils::logging::TEST_LOGGING,
    };

    use super::ExportDirSource;

    const WORK_EXPORT: &str = r#"{
        "summary": "Work",
        "items": [
            {
                "id": "w1",
                "summary": "Coding",
                "start": { "dateTime": "2024-03-01T09:00:00+08:00" },
                "end": { "dateTime": "2024-03-01T11:00:00+08:00" }
            },
            {
                "id": "w2",
                "start": { "date": "2024-03-04" },
                "end": { "date": "2024-03-05" }
            },
            {
                "id": "w3",
                "summary": "Dropped",
                "status": "cancelled",
                "start": { "dateTime": "2024-03-01T12:00:00+08:00" },
                "end": { "dateTime": "2024-03-01T13:00:00+08:00" }
            },
            {
                "id": "w4",
                "summary": "Too late",
                "start": { "dateTime": "2024-05-01T12:00:00+08:00" },
                "end": { "dateTime": "2024-05-01T13:00:00+08:00" }
            },
            {
                "id": "w5",
                "summary": "Broken",
                "start": { "dateTime": "yesterday" },
                "end": { "dateTime": "2024-03-02T13:00:00+08:00" }
            }
        ]
    }"#;

    const CLASS_EXPORT: &str = r#"{
        "summary": "Class schedule",
        "items": [
            {
                "id": "c1",
                "summary": "Algorithms",
                "description": "Room 101",
                "start": { "dateTime": "2024-03-05T10:00:00+08:00" },
                "end": { "dateTime": "2024-03-05T12:00:00+08:00" }
            }
        ]
    }"#;

    fn march() -> DateWindow {
        DateWindow::new(at("2024-03-01T00:00:00+08:00"), at("2024-03-31T23:59:59+08:00"))
    }

    fn requested(names: &[&str]) -> Vec<String> {
        names.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn reads_matching_calendars() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        fs::write(dir.path().join("work.json"), WORK_EXPORT)?;
        fs::write(dir.path().join("class.json"), CLASS_EXPORT)?;
        fs::write(dir.path().join("notes.txt"), "not a calendar")?;

        let source = ExportDirSource::new(dir.path().to_path_buf());
        let events = source
            .fetch_events(&requested(&["work", "class"]), march())
            .await?;

        let ids = events.iter().map(|v| &*v.id).collect::<Vec<_>>();
        // files are read in name order
        assert_eq!(ids, vec!["c1", "w1", "w2", "w5"]);

        assert_eq!(&*events[0].source_type, "Class");
        assert_eq!(events[0].description.as_deref(), Some("Room 101"));
        assert_eq!(&*events[1].source_type, "Work");
        assert_eq!(events[1].duration_hours(), 2.);
        assert_eq!(&*events[2].summary, "Untitled");
        assert!(events[2].is_all_day());
        assert_eq!(events[3].duration_hours(), 0.);
        Ok(())
    }

    #[tokio::test]
    async fn skips_unrequested_and_broken_calendars() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        fs::write(dir.path().join("a-broken.json"), "{ not json")?;
        fs::write(dir.path().join("work.json"), WORK_EXPORT)?;
        fs::write(dir.path().join("class.json"), CLASS_EXPORT)?;

        let source = ExportDirSource::new(dir.path().to_path_buf());
        let events = source.fetch_events(&requested(&["Work"]), march()).await?;
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|v| &*v.source_type == "Work"));

        let events = source.fetch_events(&requested(&["Life"]), march()).await?;
        assert!(events.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn calendar_name_falls_back_to_file_name() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        fs::write(
            dir.path().join("study.json"),
            r#"{ "items": [{
                "summary": "Reading",
                "start": { "dateTime": "2024-03-06T10:00:00+08:00" },
                "end": { "dateTime": "2024-03-06T10:30:00+08:00" }
            }] }"#,
        )?;

        let source = ExportDirSource::new(dir.path().to_path_buf());
        let events = source.fetch_events(&requested(&["Study"]), march()).await?;

        assert_eq!(events.len(), 1);
        assert_eq!(&*events[0].id, "study-0");
        assert_eq!(&*events[0].source_type, "Study");
        Ok(())
    }

    #[tokio::test]
    async fn missing_directory_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let source = ExportDirSource::new(dir.path().join("missing"));
        assert!(source
            .fetch_events(&requested(&["Work"]), march())
            .await?
            .is_empty());
        Ok(())
    }
}
