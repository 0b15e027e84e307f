// Corpus loader: reads the known and unknown document groups from disk.
//
// Layout:
//   <known>/<author>/<document>.txt   one directory per known author
//   <unknown>/<document>.txt          documents to attribute
//
// Document ids are paths relative to the group root, with `/` separators.
// Files that are not valid UTF-8 are decoded lossily.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::{Corpus, KnownDocument, UnknownDocument};
use super::{AuthorId, DocumentId};

const TEXT_EXTENSION: &str = "txt";

/// Load both groups of a corpus.
pub fn load_corpus(known_dir: &Path, unknown_dir: &Path) -> Result<Corpus> {
    let known = load_known(known_dir)?;
    let unknown = load_unknown(unknown_dir)?;
    info!(
        known = known.len(),
        unknown = unknown.len(),
        "Loaded corpus"
    );
    Ok(Corpus { known, unknown })
}

/// Load every `*.txt` under each author directory of `dir`.
pub fn load_known(dir: &Path) -> Result<Vec<KnownDocument>> {
    let mut documents = Vec::new();
    for author_dir in sorted_entries(dir)? {
        if !author_dir.is_dir() {
            continue;
        }
        let author = file_name(&author_dir);
        for path in text_files(&author_dir)? {
            documents.push(KnownDocument {
                id: relative_id(dir, &path),
                author: AuthorId::new(author.clone()),
                text: read_text(&path)?,
            });
        }
    }
    Ok(documents)
}

/// Load every `*.txt` directly under `dir`.
pub fn load_unknown(dir: &Path) -> Result<Vec<UnknownDocument>> {
    text_files(dir)?
        .into_iter()
        .map(|path| {
            Ok(UnknownDocument {
                id: relative_id(dir, &path),
                text: read_text(&path)?,
            })
        })
        .collect()
}

/// All `*.txt` files under `dir`, recursively, sorted by path.
pub fn text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in sorted_entries(dir)? {
        if path.is_dir() {
            files.extend(text_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == TEXT_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read a file to a string, replacing invalid UTF-8.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading document {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read document");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Document id for `path` relative to the group root.
pub fn relative_id(root: &Path, path: &Path) -> DocumentId {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    DocumentId::new(parts.join("/"))
}

/// Author of a known document id: its first path segment.
///
/// Returns `None` for ids with no directory part, since those were not
/// loaded from an author directory.
pub fn author_of(document: &DocumentId) -> Option<AuthorId> {
    let (author, rest) = document.as_str().split_once('/')?;
    if author.is_empty() || rest.is_empty() {
        return None;
    }
    Some(AuthorId::new(author))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    let read_dir =
        std::fs::read_dir(dir).with_context(|| format!("listing directory {}", dir.display()))?;
    for entry in read_dir {
        let entry = entry.with_context(|| format!("listing directory {}", dir.display()))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quillmark_loader_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_known_by_author_directory() {
        let dir = scratch_dir("known");
        std::fs::create_dir_all(dir.join("austen")).unwrap();
        std::fs::create_dir_all(dir.join("melville")).unwrap();
        std::fs::write(dir.join("austen/emma.txt"), "Emma Woodhouse").unwrap();
        std::fs::write(dir.join("melville/moby.txt"), "Call me Ishmael").unwrap();
        std::fs::write(dir.join("melville/notes.md"), "ignored").unwrap();
        std::fs::write(dir.join("stray.txt"), "no author").unwrap();

        let docs = load_known(&dir).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].author.as_str(), "austen");
        assert_eq!(docs[0].id.as_str(), "austen/emma.txt");
        assert_eq!(docs[1].author.as_str(), "melville");
        assert_eq!(docs[1].text, "Call me Ishmael");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_unknown_lossy_utf8() {
        let dir = scratch_dir("unknown");
        std::fs::write(dir.join("b.txt"), [b'o', b'k', 0xff]).unwrap();
        std::fs::write(dir.join("a.txt"), "first").unwrap();

        let docs = load_unknown(&dir).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id.as_str(), "a.txt");
        assert!(docs[1].text.starts_with("ok"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_author_of_first_segment() {
        assert_eq!(
            author_of(&DocumentId::new("austen/novels/emma.txt")),
            Some(AuthorId::new("austen"))
        );
        assert_eq!(author_of(&DocumentId::new("stray.txt")), None);
        assert_eq!(author_of(&DocumentId::new("/x.txt")), None);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let missing = std::env::temp_dir().join("quillmark_loader_does_not_exist");
        assert!(load_unknown(&missing).is_err());
    }
}
