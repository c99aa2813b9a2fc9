use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Persisted record of offer ids that have already been announced.
///
/// The on-disk layout is a pretty-printed JSON array of strings. Ids are
/// only ever added, never removed, so the file never shrinks across runs.
pub struct SentStore {
    path: PathBuf,
}

impl SentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SentStore { path: path.into() }
    }

    /// A missing or unreadable file is not an error: the first run simply
    /// has no history.
    pub fn load(&self) -> HashSet<String> {
        match fs::read_to_string(&self.path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_default(),
            Err(_) => HashSet::new(),
        }
    }

    /// Writes the complete set, replacing the file atomically via a temp
    /// file and rename so a failed write cannot corrupt prior state.
    pub fn save(&self, sent: &HashSet<String>) -> io::Result<()> {
        let mut ids: Vec<&String> = sent.iter().collect();
        ids.sort();
        let data = serde_json::to_string_pretty(&ids)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)
    }
}
