//! Directory listing module
//!
//! Renders the generated index page for directories without an index file.

use super::entry::FileSystemEntry;
use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use std::fmt::Write;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

/// Entries older or newer than this show a year instead of a time
const RECENT_MS: i64 = 183 * 24 * 60 * 60 * 1000;

/// Footer identification line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub name: String,
    pub version: String,
    pub url: String,
}

impl Default for Identification {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            url: "https://github.com/".to_string(),
        }
    }
}

/// Render the listing page for `dir`
///
/// Fails when the directory cannot be read.
pub async fn render(dir: &Path, request_path: &str, identification: &Identification) -> io::Result<String> {
    let mut names = Vec::new();
    let mut reader = fs::read_dir(dir).await?;
    while let Some(item) = reader.next_entry().await? {
        names.push(item.file_name());
    }
    names.sort_unstable();

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        // lookup uses the raw name, only the displayed text is lossy
        let path = dir.join(&name);
        let entry = match FileSystemEntry::probe(&path).await {
            Some(entry) => entry,
            None => FileSystemEntry::absent(&path),
        };
        entries.push((name.to_string_lossy().into_owned(), entry));
    }

    let mut page = String::new();
    write_page(&mut page, request_path, &entries, identification, now_ms())
        .map_err(io::Error::other)?;
    Ok(page)
}

fn write_page(
    page: &mut String,
    request_path: &str,
    entries: &[(String, FileSystemEntry)],
    identification: &Identification,
    now_ms: i64,
) -> std::fmt::Result {
    writeln!(page, "<HTML><HEAD>")?;
    writeln!(page, "<TITLE>Index of {request_path}</TITLE>")?;
    writeln!(page, "</HEAD><BODY BGCOLOR=\"#F1D0F2\">")?;
    writeln!(page, "<H2>Index of {request_path}</H2>")?;
    writeln!(page, "<PRE>")?;
    writeln!(page, "mode         bytes  last-changed  name")?;
    writeln!(page, "<HR>")?;
    for (name, entry) in entries {
        writeln!(page, "{}", format_entry(name, entry, now_ms))?;
    }
    writeln!(page, "</PRE>")?;
    writeln!(page, "<HR>")?;
    writeln!(
        page,
        "<ADDRESS><A HREF=\"{}\">{} {}</A></ADDRESS>",
        identification.url, identification.name, identification.version
    )?;
    writeln!(page, "</BODY></HTML>")
}

/// One listing row: mode, size, date and link
fn format_entry(name: &str, entry: &FileSystemEntry, now_ms: i64) -> String {
    let suffix = if entry.is_directory { "/" } else { "" };
    format!(
        "{}  {:>12}  {:<14}  <A HREF=\"{name}{suffix}\">{name}{suffix}</A>",
        mode_string(entry),
        entry.len,
        ls_date(entry.modified_ms, now_ms),
    )
}

fn mode_string(entry: &FileSystemEntry) -> String {
    let kind = if entry.is_directory {
        'd'
    } else if entry.is_regular_file {
        '-'
    } else {
        '?'
    };
    let read = if entry.readable { 'r' } else { '-' };
    let write = if entry.writable { 'w' } else { '-' };
    format!("{kind}{read}{write}-")
}

/// `ls -l` style date: time of day for recent entries, year otherwise
fn ls_date(modified_ms: i64, now_ms: i64) -> String {
    let Some(date) = DateTime::<Utc>::from_timestamp_millis(modified_ms) else {
        return "------------".to_string();
    };
    let date = date.with_timezone(&Local);
    let month = date.format("%b");

    if (now_ms - modified_ms).abs() < RECENT_MS {
        format!("{month}{:>3}{:>3}:{:02}", date.day(), date.hour(), date.minute())
    } else {
        format!("{month}{:>3}{:>6}", date.day(), date.year())
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |since| i64::try_from(since.as_millis()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn local_ms(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .earliest()
            .unwrap()
            .timestamp_millis()
    }

    fn file_entry(len: u64, modified_ms: i64) -> FileSystemEntry {
        FileSystemEntry {
            path: PathBuf::from("/x"),
            is_directory: false,
            is_regular_file: true,
            readable: true,
            writable: false,
            len,
            modified_ms,
        }
    }

    #[test]
    fn test_ls_date_recent_shows_time() {
        let modified = local_ms(2024, 3, 5, 9, 7);
        let now = local_ms(2024, 4, 1, 12, 0);
        assert_eq!(ls_date(modified, now), "Mar  5  9:07");
    }

    #[test]
    fn test_ls_date_old_shows_year() {
        let modified = local_ms(2019, 12, 25, 18, 30);
        let now = local_ms(2024, 4, 1, 12, 0);
        assert_eq!(ls_date(modified, now), "Dec 25  2019");
    }

    #[test]
    fn test_mode_string() {
        let mut entry = file_entry(0, 0);
        assert_eq!(mode_string(&entry), "-r--");
        entry.writable = true;
        assert_eq!(mode_string(&entry), "-rw-");
        entry.is_regular_file = false;
        entry.is_directory = true;
        assert_eq!(mode_string(&entry), "drw-");
        assert_eq!(mode_string(&FileSystemEntry::absent(Path::new("/gone"))), "?---");
    }

    #[test]
    fn test_format_entry_columns() {
        let modified = local_ms(2019, 12, 25, 18, 30);
        let now = local_ms(2024, 4, 1, 12, 0);
        let line = format_entry("notes.txt", &file_entry(1234, modified), now);
        assert_eq!(
            line,
            "-r--          1234  Dec 25  2019    <A HREF=\"notes.txt\">notes.txt</A>"
        );

        let mut dir = file_entry(4096, modified);
        dir.is_directory = true;
        dir.is_regular_file = false;
        let line = format_entry("sub", &dir, now);
        assert!(line.starts_with("dr--"));
        assert!(line.ends_with("<A HREF=\"sub/\">sub/</A>"));
    }

    #[tokio::test]
    async fn test_render_sorted_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"bb").unwrap();
        std::fs::write(dir.path().join("B.txt"), b"B").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let page = render(dir.path(), "/files/", &Identification::default())
            .await
            .unwrap();

        assert!(page.contains("<TITLE>Index of /files/</TITLE>"));
        assert!(page.contains("<H2>Index of /files/</H2>"));
        assert!(page.contains("mode         bytes  last-changed  name"));

        let links: Vec<&str> = page
            .lines()
            .filter_map(|line| line.split("  <A HREF=").nth(1))
            .collect();
        assert_eq!(
            links,
            [
                "\"B.txt\">B.txt</A>",
                "\"a.txt\">a.txt</A>",
                "\"b.txt\">b.txt</A>",
                "\"sub/\">sub/</A>",
            ]
        );
        assert!(page.contains(&format!(
            "<ADDRESS><A HREF=\"https://github.com/\">static_serve {}</A></ADDRESS>",
            env!("CARGO_PKG_VERSION")
        )));
        assert!(page.ends_with("</BODY></HTML>\n"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_render_non_utf8_name_keeps_metadata() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9.txt");
        std::fs::write(dir.path().join(raw), b"latin").unwrap();

        let page = render(dir.path(), "/files/", &Identification::default())
            .await
            .unwrap();
        let row = page
            .lines()
            .find(|line| line.contains("caf\u{FFFD}.txt"))
            .unwrap();
        assert!(row.starts_with("-r"), "{row}");
        assert!(row.contains("             5  "), "{row}");
    }

    #[tokio::test]
    async fn test_render_unreadable_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(render(&missing, "/missing/", &Identification::default()).await.is_err());
    }
}
