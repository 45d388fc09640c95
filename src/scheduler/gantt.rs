use std::fmt;

/// One contiguous slice of CPU time. `process` is `None` for an idle slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttEntry {
    pub process: Option<String>,
    pub start: u32,
    pub end: u32,
}

impl GanttEntry {
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_idle(&self) -> bool {
        self.process.is_none()
    }
}

impl fmt::Display for GanttEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{},{})",
            self.process.as_deref().unwrap_or("idle"),
            self.start,
            self.end
        )
    }
}

/// Append-only execution history. Entries tile `[0, end())` without gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GanttRecord {
    entries: Vec<GanttEntry>,
}

impl GanttRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, process: Option<&str>, start: u32) {
        debug_assert_eq!(start, self.end(), "gantt entries must be contiguous");
        self.entries.push(GanttEntry {
            process: process.map(str::to_owned),
            start,
            end: start + 1,
        });
    }

    pub fn entries(&self) -> &[GanttEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn end(&self) -> u32 {
        self.entries.last().map_or(0, |entry| entry.end)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Consecutive entries of the same process folded into one slice, for
    /// display.
    pub fn merged(&self) -> Vec<GanttEntry> {
        let mut merged: Vec<GanttEntry> = Vec::new();
        for entry in &self.entries {
            match merged.last_mut() {
                Some(last) if last.process == entry.process && last.end == entry.start => {
                    last.end = entry.end;
                }
                _ => merged.push(entry.clone()),
            }
        }
        merged
    }
}
