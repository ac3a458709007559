//! Flat-file persistence for the roster.
//!
//! One student per line, fields separated by single spaces:
//!
//! ```text
//! <id> <name> <grade-count> <grade1> ... <gradeN>
//! ```
//!
//! The name is a single token, so names containing whitespace do not survive a
//! save/load cycle.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Result, RosterError};
use crate::models::{Student, StudentId};
use crate::store::RecordStore;

pub const DATA_FILE: &str = "students_data.txt";

/// Outcome of `load`: everything parsed, plus the reason parsing stopped early, if it did.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub store: RecordStore,
    pub stopped: Option<RosterError>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.stopped.is_none()
    }
}

/// Read the roster from `path`.
///
/// A missing file is the normal first run and yields an empty roster. Any other
/// failure keeps the students read so far and records why reading stopped.
pub fn load(path: impl AsRef<Path>) -> LoadReport {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no roster file yet, starting empty");
            return LoadReport::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot open roster file");
            return LoadReport { store: RecordStore::new(), stopped: Some(RosterError::io(path, e)) };
        }
    };

    let mut report = LoadReport::default();
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => line_no += 1,
            Err(e) => {
                report.stopped = Some(RosterError::io(path, e));
                break;
            }
        }
        // Decode per line so a stray non-UTF-8 name is pinned to its line number.
        let line = match std::str::from_utf8(&buf) {
            Ok(l) => l.trim_end_matches(['\n', '\r']),
            Err(_) => {
                report.stopped = Some(RosterError::MalformedRecord {
                    line: line_no,
                    reason: "invalid UTF-8".to_string(),
                });
                break;
            }
        };
        match parse_line(line_no, line) {
            Ok(Some((id, student))) => report.store.insert_or_replace(id, student),
            Ok(None) => {}
            Err(e) => {
                report.stopped = Some(e);
                break;
            }
        }
    }

    match &report.stopped {
        None => info!(path = %path.display(), students = report.store.len(), "roster loaded"),
        Some(e) => warn!(
            path = %path.display(),
            students = report.store.len(),
            error = %e,
            "roster load stopped early"
        ),
    }
    report
}

/// Rewrite `path` with the whole roster. The store is only read.
pub fn save(path: impl AsRef<Path>, store: &RecordStore) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| RosterError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for (id, student) in store.list_records() {
        writeln!(out, "{}", format_line(id, student)).map_err(|e| RosterError::io(path, e))?;
    }
    out.flush().map_err(|e| RosterError::io(path, e))?;
    info!(path = %path.display(), students = store.len(), "roster saved");
    Ok(())
}

pub fn format_line(id: StudentId, student: &Student) -> String {
    let mut line = format!("{} {} {}", id, student.name, student.grades.len());
    for g in &student.grades {
        line.push(' ');
        line.push_str(&g.to_string());
    }
    line
}

/// Parse one line of the data file. Blank lines yield `Ok(None)`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<(StudentId, Student)>> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(None);
    };
    let malformed = |reason: String| RosterError::MalformedRecord { line: line_no, reason };

    let id: StudentId = first
        .parse()
        .map_err(|_| malformed(format!("invalid id {first:?}")))?;
    let name = tokens
        .next()
        .ok_or_else(|| malformed("missing name".to_string()))?;
    let count_tok = tokens
        .next()
        .ok_or_else(|| malformed("missing grade count".to_string()))?;
    let count: i32 = count_tok
        .parse()
        .map_err(|_| malformed(format!("invalid grade count {count_tok:?}")))?;
    if count < 0 {
        return Err(malformed(format!("negative grade count {count}")));
    }

    let mut grades = Vec::new();
    for n in 0..count {
        let tok = tokens
            .next()
            .ok_or_else(|| malformed(format!("expected {count} grades, found {n}")))?;
        let grade: i32 = tok
            .parse()
            .map_err(|_| malformed(format!("invalid grade {tok:?}")))?;
        grades.push(grade);
    }
    if let Some(extra) = tokens.next() {
        return Err(malformed(format!("unexpected token {extra:?} after {count} grades")));
    }

    debug!(line = line_no, id, "parsed student");
    Ok(Some((id, Student::with_grades(name, grades))))
}
