use crate::word::Word;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

const APP_DIR: &str = "wordle-constraints";
const USER_WORDBANK_FILE: &str = "words.txt";

/// Keeps valid words in their original order, dropping repeats.
fn collect_words<I: IntoIterator<Item = String>>(lines: I) -> Vec<Word> {
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .filter_map(|line| Word::new(line.trim()).ok())
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

#[must_use]
pub fn load_wordbank_from_str(data: &str) -> Vec<Word> {
    collect_words(data.lines().map(str::to_string))
}

/// # Errors
/// Returns any I/O error from opening or reading `path`.
pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<Word>> {
    let reader = BufReader::new(File::open(path)?);
    let lines = reader.lines().collect::<io::Result<Vec<_>>>()?;
    Ok(collect_words(lines))
}

/// Location of an optional per-user word list.
#[must_use]
pub fn user_wordbank_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(USER_WORDBANK_FILE))
}

/// Where the session's word list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordbankSource {
    File(PathBuf),
    User(PathBuf),
    Embedded,
}

/// Loads the explicit path if given, else the user word list if one
/// exists, else the embedded list.
///
/// # Errors
/// Returns an I/O error if a chosen file cannot be read, or
/// `InvalidData` if it holds no usable words.
pub fn resolve_wordbank(explicit: Option<&Path>) -> io::Result<(Vec<Word>, WordbankSource)> {
    let (words, source) = if let Some(path) = explicit {
        (
            load_wordbank_from_file(path)?,
            WordbankSource::File(path.to_path_buf()),
        )
    } else if let Some(path) = user_wordbank_path()
        && path.is_file()
    {
        (load_wordbank_from_file(&path)?, WordbankSource::User(path))
    } else {
        (
            load_wordbank_from_str(EMBEDDED_WORDBANK),
            WordbankSource::Embedded,
        )
    };

    if words.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("no usable words in {source:?}"),
        ));
    }
    log::info!("loaded {} words from {source:?}", words.len());
    Ok((words, source))
}
