// src/patch.rs

/// One line-level edit from a unified diff. Line numbers are 1-based.
/// A replaced line shows up as a `Deleted` at its old position plus an
/// `Inserted` at its new one; the engine only cares about insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    Inserted { new_line: u32 },
    Deleted { old_line: u32 },
    Unchanged { old_line: u32, new_line: u32 },
}

/// All line changes for one file in the diff. A pure addition has no
/// `old_path`; a pure deletion has no `new_path`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePatch {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub changes: Vec<LineChange>,
}

impl FilePatch {
    pub fn inserted_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.changes.iter().filter_map(|c| match c {
            LineChange::Inserted { new_line } => Some(*new_line),
            _ => None,
        })
    }
}

/// Parse unified diff text into per-file line changes.
///
/// Only the structure the engine needs is extracted: file headers and
/// hunk content. `index`/mode lines and binary-file notices carry no
/// line changes and are skipped. Hunk extents come from the `@@` header
/// counts, so content lines that happen to start with `-` or `+` are
/// never mistaken for headers.
pub fn parse_patch(text: &str) -> Vec<FilePatch> {
    let mut files: Vec<FilePatch> = Vec::new();
    let mut current: Option<FilePatch> = None;
    // Lines still expected on each side of the open hunk.
    let mut old_left = 0u32;
    let mut new_left = 0u32;
    let mut old_line = 0u32;
    let mut new_line = 0u32;

    for line in text.lines() {
        if old_left > 0 || new_left > 0 {
            let mut chars = line.chars();
            match chars.next() {
                Some('+') => {
                    if let Some(file) = current.as_mut() {
                        file.changes.push(LineChange::Inserted { new_line });
                    }
                    new_line += 1;
                    new_left = new_left.saturating_sub(1);
                }
                Some('-') => {
                    if let Some(file) = current.as_mut() {
                        file.changes.push(LineChange::Deleted { old_line });
                    }
                    old_line += 1;
                    old_left = old_left.saturating_sub(1);
                }
                Some(' ') | None => {
                    if let Some(file) = current.as_mut() {
                        file.changes.push(LineChange::Unchanged { old_line, new_line });
                    }
                    old_line += 1;
                    new_line += 1;
                    old_left = old_left.saturating_sub(1);
                    new_left = new_left.saturating_sub(1);
                }
                // `\ No newline at end of file`
                Some('\\') => {}
                _ => {
                    // Malformed hunk body; close the hunk rather than
                    // misattribute line numbers.
                    old_left = 0;
                    new_left = 0;
                }
            }
            continue;
        }

        if line.starts_with("diff ") {
            if let Some(file) = current.take() {
                files.push(file);
            }
            current = Some(FilePatch::default());
        } else if let Some(rest) = line.strip_prefix("--- ") {
            if let Some(file) = current.as_mut() {
                file.old_path = clean_path(rest, "a/");
            }
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            if let Some(file) = current.as_mut() {
                file.new_path = clean_path(rest, "b/");
            }
        } else if let Some(header) = line.strip_prefix("@@ -") {
            if current.is_none() {
                // Headerless fragment (no `diff`/`---` lines); still
                // parseable as a single anonymous file.
                current = Some(FilePatch::default());
            }
            if let Some(((os, oc), (ns, nc))) = parse_hunk_header(header) {
                old_line = os;
                new_line = ns;
                old_left = oc;
                new_left = nc;
            }
        }
    }
    if let Some(file) = current.take() {
        files.push(file);
    }
    files
}

/// `@@ -old_start[,old_count] +new_start[,new_count] @@ ...` with the
/// leading `@@ -` already stripped.
fn parse_hunk_header(rest: &str) -> Option<((u32, u32), (u32, u32))> {
    let mut parts = rest.split(' ');
    let old = parse_range(parts.next()?)?;
    let new = parse_range(parts.next()?.strip_prefix('+')?)?;
    Some((old, new))
}

/// `start[,count]`; count defaults to 1 when omitted.
fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

fn clean_path(raw: &str, prefix: &str) -> Option<String> {
    // `--- a/path\tmtime` is legal; everything after a tab is metadata.
    let raw = raw.split('\t').next().unwrap_or(raw);
    if raw == "/dev/null" {
        return None;
    }
    Some(raw.strip_prefix(prefix).unwrap_or(raw).to_string())
}
