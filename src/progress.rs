use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Pattern};
use crate::error::{Error, Result};

/// Problem id to solved flag.
pub type SolvedMap = BTreeMap<String, bool>;

/// Per-user solved-problem storage.
pub trait ProgressStore {
    /// Solved map of `user`; a user seen for the first time is created
    /// with an empty map.
    fn load(&mut self, user: &str) -> Result<SolvedMap>;

    fn set_solved(&mut self, user: &str, problem: &str, solved: bool) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    /// Unix seconds
    #[serde(default)]
    created_at: u64,
    #[serde(default)]
    solved_problems: SolvedMap,
}

impl UserRecord {
    fn fresh() -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        UserRecord {
            created_at,
            solved_problems: SolvedMap::new(),
        }
    }
}

/// One JSON document per user inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    /// Store under the platform data directory, e.g.
    /// `~/.local/share/patternflix/progress`.
    pub fn default_location() -> Result<Self> {
        let dir = dirs::data_dir().ok_or(Error::NoDataDir)?;
        Ok(Self::new(dir.join("patternflix").join("progress")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, user: &str) -> PathBuf {
        let safe: String = user
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    fn read(&self, user: &str) -> Result<Option<UserRecord>> {
        let path = self.path(user);
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(path, e)),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| Error::Progress { path, source })
    }

    fn write(&self, user: &str, record: &UserRecord) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
        let path = self.path(user);
        let json = serde_json::to_string_pretty(record).map_err(|source| Error::Progress {
            path: path.clone(),
            source,
        })?;
        // Replaced through a rename, never written in place
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| Error::io(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| Error::io(&path, e))
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&mut self, user: &str) -> Result<SolvedMap> {
        if let Some(record) = self.read(user)? {
            return Ok(record.solved_problems);
        }
        tracing::info!(user, "creating progress record");
        let record = UserRecord::fresh();
        self.write(user, &record)?;
        Ok(record.solved_problems)
    }

    fn set_solved(&mut self, user: &str, problem: &str, solved: bool) -> Result<()> {
        let mut record = self.read(user)?.unwrap_or_else(UserRecord::fresh);
        record.solved_problems.insert(problem.to_string(), solved);
        self.write(user, &record)?;
        tracing::debug!(user, problem, solved, "progress updated");
        Ok(())
    }
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: HashMap<String, SolvedMap>,
}

impl ProgressStore for MemoryStore {
    fn load(&mut self, user: &str) -> Result<SolvedMap> {
        Ok(self.users.entry(user.to_string()).or_default().clone())
    }

    fn set_solved(&mut self, user: &str, problem: &str, solved: bool) -> Result<()> {
        self.users
            .entry(user.to_string())
            .or_default()
            .insert(problem.to_string(), solved);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub solved: usize,
    pub total: usize,
}

impl Tally {
    /// Solved share rounded to a whole percent; 0 for an empty catalog.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.solved as f64 * 100.0 / self.total as f64).round() as u32
    }
}

fn tally<'a>(problems: impl Iterator<Item = &'a crate::catalog::Problem>, solved: &SolvedMap) -> Tally {
    let mut t = Tally { solved: 0, total: 0 };
    for p in problems {
        t.total += 1;
        if solved.get(&p.id).copied().unwrap_or(false) {
            t.solved += 1;
        }
    }
    t
}

/// Totals over the whole catalog. Solved entries for ids the catalog does
/// not list are ignored.
pub fn overall(catalog: &Catalog, solved: &SolvedMap) -> Tally {
    tally(catalog.problems(), solved)
}

pub fn per_pattern<'a>(catalog: &'a Catalog, solved: &SolvedMap) -> Vec<(&'a Pattern, Tally)> {
    catalog
        .patterns
        .iter()
        .map(|p| (p, tally(p.problems(), solved)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"[
                {"id": "a", "name": "A", "subPatterns": [
                    {"id": "a1", "name": "A1", "problems": [
                        {"id": "1", "name": "one"}, {"id": "2", "name": "two"}, {"id": "3", "name": "three"}
                    ]}
                ]},
                {"id": "b", "name": "B", "subPatterns": [
                    {"id": "b1", "name": "B1", "problems": [{"id": "4", "name": "four"}]}
                ]}
            ]"#,
        )
        .unwrap()
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("patternflix-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_new_user_gets_empty_record_on_disk() {
        let dir = scratch("new-user");
        let mut store = JsonFileStore::new(&dir);
        assert!(store.load("alice").unwrap().is_empty());
        assert!(dir.join("alice.json").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_solved_flags_persist() {
        let dir = scratch("persist");
        let mut store = JsonFileStore::new(&dir);
        store.set_solved("bob", "1", true).unwrap();
        store.set_solved("bob", "2", true).unwrap();
        store.set_solved("bob", "2", false).unwrap();

        let mut reopened = JsonFileStore::new(&dir);
        let map = reopened.load("bob").unwrap();
        assert_eq!(map.get("1"), Some(&true));
        assert_eq!(map.get("2"), Some(&false));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_user_ids_cannot_escape_the_directory() {
        let store = JsonFileStore::new("/data");
        assert_eq!(store.path("../etc/passwd"), PathBuf::from("/data/___etc_passwd.json"));
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let dir = scratch("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("carol.json"), "[1, 2").unwrap();
        let mut store = JsonFileStore::new(&dir);
        assert!(matches!(store.load("carol"), Err(Error::Progress { .. })));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_overall_and_per_pattern() {
        let catalog = catalog();
        let mut store = MemoryStore::default();
        store.set_solved("u", "1", true).unwrap();
        store.set_solved("u", "2", false).unwrap();
        store.set_solved("u", "4", true).unwrap();
        store.set_solved("u", "999", true).unwrap();
        let map = store.load("u").unwrap();

        let all = overall(&catalog, &map);
        assert_eq!(all, Tally { solved: 2, total: 4 });
        assert_eq!(all.percent(), 50);

        let rows: Vec<(&str, Tally)> = per_pattern(&catalog, &map)
            .into_iter()
            .map(|(p, t)| (p.id.as_str(), t))
            .collect();
        assert_eq!(
            rows,
            vec![("a", Tally { solved: 1, total: 3 }), ("b", Tally { solved: 1, total: 1 })]
        );
    }

    #[test]
    fn test_percent_rounds_and_handles_empty() {
        assert_eq!(Tally { solved: 1, total: 3 }.percent(), 33);
        assert_eq!(Tally { solved: 2, total: 3 }.percent(), 67);
        assert_eq!(Tally { solved: 0, total: 0 }.percent(), 0);
    }
}
