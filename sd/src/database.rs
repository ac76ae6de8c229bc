//! Core StyleDatabase implementation

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, StyleError};
use crate::format;
use crate::merge::apply_styles_to_prompt;
use crate::style::PromptStyle;

/// Styles merged from a base file and a user file
#[derive(Debug, Clone)]
pub struct StyleDatabase {
    /// Loaded styles by name
    styles: BTreeMap<String, PromptStyle>,
    /// Fallback for unknown names, never stored in `styles`
    no_style: PromptStyle,
    /// Base styles file
    path: PathBuf,
    /// User-editable styles file, loaded after `path`
    user_path: PathBuf,
}

impl StyleDatabase {
    /// Create a database over the two files and load them
    pub fn new(path: impl AsRef<Path>, user_path: impl AsRef<Path>) -> Result<Self> {
        let mut db = Self {
            styles: BTreeMap::new(),
            no_style: PromptStyle::none(),
            path: path.as_ref().to_path_buf(),
            user_path: user_path.as_ref().to_path_buf(),
        };
        db.reload()?;
        Ok(db)
    }

    /// Create a database over a single file, e.g. just the user layer
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::new(path, path)
    }

    /// Clear and re-read both files, base first, so user rows override base rows.
    ///
    /// A missing file is logged and skipped. A malformed file is an error and
    /// leaves whatever was loaded before it. When both paths name the same
    /// file it is read once.
    pub fn reload(&mut self) -> Result<()> {
        self.styles.clear();

        let sources = [(&self.path, "styles"), (&self.user_path, "user styles")];
        let count = if self.path == self.user_path { 1 } else { 2 };
        for (path, label) in sources.into_iter().take(count) {
            if !path.exists() {
                warn!(path = %path.display(), "Can't find {} file", label);
                continue;
            }

            for style in format::read_styles(path)? {
                self.styles.insert(style.name.clone(), style);
            }
        }

        debug!(count = self.styles.len(), "Reloaded styles");
        Ok(())
    }

    /// Base styles file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// User styles file
    pub fn user_path(&self) -> &Path {
        &self.user_path
    }

    /// The fallback style used for unknown names
    pub fn no_style(&self) -> &PromptStyle {
        &self.no_style
    }

    pub fn get(&self, name: &str) -> Option<&PromptStyle> {
        self.styles.get(name)
    }

    /// Look up a style, falling back to the empty style
    pub fn style(&self, name: &str) -> &PromptStyle {
        self.styles.get(name).unwrap_or(&self.no_style)
    }

    /// Insert or replace a style, returning the one it replaced
    pub fn insert(&mut self, style: PromptStyle) -> Option<PromptStyle> {
        self.styles.insert(style.name.clone(), style)
    }

    pub fn remove(&mut self, name: &str) -> Option<PromptStyle> {
        self.styles.remove(name)
    }

    /// Style names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.styles.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptStyle> {
        self.styles.values()
    }

    /// Positive fragments for each name, in input order
    pub fn get_style_prompts<S: AsRef<str>>(&self, names: &[S]) -> Vec<&str> {
        names.iter().map(|n| self.style(n.as_ref()).prompt.as_str()).collect()
    }

    /// Negative fragments for each name, in input order
    pub fn get_negative_style_prompts<S: AsRef<str>>(&self, names: &[S]) -> Vec<&str> {
        names
            .iter()
            .map(|n| self.style(n.as_ref()).negative_prompt.as_str())
            .collect()
    }

    /// Apply the named styles' positive fragments to `prompt` in order
    pub fn apply_styles_to_prompt<S: AsRef<str>>(&self, prompt: &str, names: &[S]) -> String {
        apply_styles_to_prompt(prompt, &self.get_style_prompts(names))
    }

    /// Apply the named styles' negative fragments to `prompt` in order
    pub fn apply_negative_styles_to_prompt<S: AsRef<str>>(&self, prompt: &str, names: &[S]) -> String {
        apply_styles_to_prompt(prompt, &self.get_negative_style_prompts(names))
    }

    /// Write every style to `target`.
    ///
    /// An existing file at `target` is first copied to `<target>.bak`,
    /// replacing any earlier backup.
    pub fn save_styles(&self, target: impl AsRef<Path>) -> Result<()> {
        let target = target.as_ref();

        if target.exists() {
            let backup = backup_path(target);
            fs::copy(target, &backup).map_err(|source| StyleError::Backup {
                path: backup.clone(),
                source,
            })?;
            info!(backup = %backup.display(), "Backed up styles");
        }

        format::write_styles(target, self.styles.values())?;
        info!(path = %target.display(), count = self.styles.len(), "Saved styles");
        Ok(())
    }
}

/// `styles.csv` -> `styles.csv.bak`
fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(crate::BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "name,prompt,negative_prompt,long_description\n";

    fn write(temp: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn sample_db(temp: &TempDir) -> StyleDatabase {
        let base = write(
            temp,
            "styles.csv",
            &format!(
                "{HEADER}watercolor,\"{{prompt}}, painted in watercolor\",photo,Soft\n\
                 sharp,highly detailed,blurry,\n"
            ),
        );
        StyleDatabase::new(base, temp.path().join("user.csv")).unwrap()
    }

    #[test]
    fn test_missing_files_load_empty() {
        let temp = TempDir::new().unwrap();
        let db = StyleDatabase::new(temp.path().join("a.csv"), temp.path().join("b.csv")).unwrap();

        assert!(db.is_empty());
        assert_eq!(db.path(), temp.path().join("a.csv"));
        assert_eq!(db.user_path(), temp.path().join("b.csv"));
    }

    #[test]
    fn test_open_single_file() {
        let temp = TempDir::new().unwrap();
        let user = write(&temp, "user.csv", &format!("{HEADER}U,user,,\n"));

        let mut db = StyleDatabase::open(&user).unwrap();
        assert_eq!(db.path(), db.user_path());
        assert_eq!(db.names(), vec!["U"]);

        db.insert(PromptStyle::new("V", "added", "", ""));
        db.save_styles(&user).unwrap();
        db.reload().unwrap();
        assert_eq!(db.names(), vec!["U", "V"]);
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let db = StyleDatabase::open(temp.path().join("none.csv")).unwrap();
        assert!(db.is_empty());
    }

    #[test]
    fn test_user_file_overrides_base() {
        let temp = TempDir::new().unwrap();
        let base = write(
            &temp,
            "styles.csv",
            &format!("{HEADER}A,\"{{prompt}}, masterpiece\",,\nB,base only,,\n"),
        );
        let user = write(&temp, "user.csv", &format!("{HEADER}A,foo,,\n"));

        let db = StyleDatabase::new(base, user).unwrap();
        assert_eq!(db.style("A").prompt, "foo");
        assert_eq!(db.style("B").prompt, "base only");
        assert_eq!(db.len(), 2);
    }

    #[test]
    fn test_user_file_alone_loads() {
        let temp = TempDir::new().unwrap();
        let user = write(&temp, "user.csv", &format!("{HEADER}U,user,,\n"));

        let db = StyleDatabase::new(temp.path().join("missing.csv"), user).unwrap();
        assert_eq!(db.names(), vec!["U"]);
    }

    #[test]
    fn test_last_row_wins_within_file() {
        let temp = TempDir::new().unwrap();
        let base = write(&temp, "styles.csv", &format!("{HEADER}A,first,,\nA,second,,\n"));

        let db = StyleDatabase::new(base, temp.path().join("user.csv")).unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db.style("A").prompt, "second");
    }

    #[test]
    fn test_legacy_file_loads() {
        let temp = TempDir::new().unwrap();
        let base = write(&temp, "styles.csv", "name,text\nold,legacy prompt\n");

        let db = StyleDatabase::new(base, temp.path().join("user.csv")).unwrap();
        assert_eq!(db.style("old").prompt, "legacy prompt");
        assert_eq!(db.style("old").negative_prompt, "");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp = TempDir::new().unwrap();
        let base = write(&temp, "styles.csv", "name,negative_prompt\nA,x\n");

        let err = StyleDatabase::new(base, temp.path().join("user.csv")).unwrap_err();
        assert!(matches!(err, StyleError::MissingColumn { .. }));
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let temp = TempDir::new().unwrap();
        let mut db = sample_db(&temp);
        assert_eq!(db.len(), 2);

        write(&temp, "user.csv", &format!("{HEADER}extra,added,,\n"));
        db.insert(PromptStyle::new("transient", "gone after reload", "", ""));
        db.reload().unwrap();

        assert_eq!(db.names(), vec!["extra", "sharp", "watercolor"]);
        db.reload().unwrap();
        assert_eq!(db.len(), 3);
    }

    #[test]
    fn test_unknown_names_resolve_to_empty() {
        let temp = TempDir::new().unwrap();
        let db = sample_db(&temp);

        assert_eq!(db.get_style_prompts(&["missing"]), vec![""]);
        assert_eq!(db.get_negative_style_prompts(&["missing"]), vec![""]);
        assert_eq!(db.apply_styles_to_prompt("cat", &["missing"]), "cat");
        assert_eq!(db.style("missing"), db.no_style());
        assert!(db.get("missing").is_none());
        assert!(db.get("None").is_none());
    }

    #[test]
    fn test_get_prompts_keep_input_order() {
        let temp = TempDir::new().unwrap();
        let db = sample_db(&temp);

        let names = ["sharp", "missing", "watercolor"];
        assert_eq!(
            db.get_style_prompts(&names),
            vec!["highly detailed", "", "{prompt}, painted in watercolor"]
        );
        assert_eq!(db.get_negative_style_prompts(&names), vec!["blurry", "", "photo"]);
    }

    #[test]
    fn test_apply_styles() {
        let temp = TempDir::new().unwrap();
        let db = sample_db(&temp);

        assert_eq!(
            db.apply_styles_to_prompt("a cat", &["watercolor"]),
            "a cat, painted in watercolor"
        );
        assert_eq!(
            db.apply_styles_to_prompt("a cat", &["watercolor", "sharp"]),
            "a cat, painted in watercolor, highly detailed"
        );
        assert_eq!(
            db.apply_negative_styles_to_prompt("lowres", &["watercolor", "sharp"]),
            "lowres, photo, blurry"
        );
    }

    #[test]
    fn test_apply_accepts_owned_names() {
        let temp = TempDir::new().unwrap();
        let db = sample_db(&temp);

        let names = vec!["sharp".to_string()];
        assert_eq!(db.apply_styles_to_prompt("cat", &names), "cat, highly detailed");
    }

    #[test]
    fn test_insert_and_remove() {
        let temp = TempDir::new().unwrap();
        let mut db = sample_db(&temp);

        let replaced = db.insert(PromptStyle::new("sharp", "crisp", "", ""));
        assert_eq!(replaced.map(|s| s.prompt), Some("highly detailed".to_string()));
        assert_eq!(db.style("sharp").prompt, "crisp");

        assert!(db.remove("sharp").is_some());
        assert!(db.remove("sharp").is_none());
        assert_eq!(db.names(), vec!["watercolor"]);
    }

    #[test]
    fn test_save_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut db = sample_db(&temp);
        db.insert(PromptStyle::new("plain", "simple text", "bad hands", "A description"));

        let saved = temp.path().join("saved.csv");
        db.save_styles(&saved).unwrap();

        let reloaded = StyleDatabase::new(temp.path().join("absent.csv"), &saved).unwrap();
        let before: Vec<_> = db.iter().cloned().collect();
        let after: Vec<_> = reloaded.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_save_creates_backup() {
        let temp = TempDir::new().unwrap();
        let db = sample_db(&temp);
        let target = write(&temp, "target.csv", "previous content");

        db.save_styles(&target).unwrap();

        let backup = temp.path().join("target.csv.bak");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "previous content");

        // second save replaces the backup with the first save's output
        let first_save = fs::read(&target).unwrap();
        db.save_styles(&target).unwrap();
        assert_eq!(fs::read(&backup).unwrap(), first_save);
    }

    #[test]
    fn test_save_new_file_has_no_backup() {
        let temp = TempDir::new().unwrap();
        let db = sample_db(&temp);
        let target = temp.path().join("fresh.csv");

        db.save_styles(&target).unwrap();

        assert!(target.exists());
        assert!(!temp.path().join("fresh.csv.bak").exists());
    }

    #[test]
    fn test_save_never_writes_sentinel() {
        let temp = TempDir::new().unwrap();
        let db = sample_db(&temp);
        let target = temp.path().join("out.csv");

        db.save_styles(&target).unwrap();

        let names: Vec<_> = format::read_styles(&target).unwrap().into_iter().map(|s| s.name).collect();
        assert!(!names.contains(&"None".to_string()));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_save_to_unwritable_path_fails() {
        let temp = TempDir::new().unwrap();
        let db = sample_db(&temp);

        let err = db.save_styles(temp.path().join("no-such-dir").join("out.csv")).unwrap_err();
        assert!(matches!(err, StyleError::Write { .. }));
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(backup_path(Path::new("/a/styles.csv")), PathBuf::from("/a/styles.csv.bak"));
    }
}
