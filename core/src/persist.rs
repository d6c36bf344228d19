use crate::error::Error;
use crate::index::{Index, PostingsStore, TermDictionary};
use crate::{DocId, Position, TermId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Postings table rows: term id -> (doc id -> ascending positions), sorted
/// by term id then doc id so serialization is byte-reproducible.
pub type PostingsRows = Vec<(TermId, Vec<(DocId, Vec<Position>)>)>;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn dictionary(&self) -> PathBuf {
        self.root.join("dictionary.bin")
    }
    fn postings(&self) -> PathBuf {
        self.root.join("postings.bin")
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

fn unavailable(path: &Path, reason: impl Display) -> Error {
    Error::IndexUnavailable { path: path.to_path_buf(), reason: reason.to_string() }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let mut f = File::create(path).map_err(|e| unavailable(path, e))?;
    f.write_all(bytes).map_err(|e| unavailable(path, e))?;
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>, Error> {
    let mut f = File::open(path).map_err(|e| unavailable(path, e))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).map_err(|e| unavailable(path, e))?;
    Ok(buf)
}

/// Term table: term string -> term id, persisted as the id-ordered term
/// vector (row index equals TermId).
pub fn save_dictionary(paths: &IndexPaths, dictionary: &TermDictionary) -> Result<(), Error> {
    create_dir_all(&paths.root).map_err(|e| unavailable(&paths.root, e))?;
    let bytes =
        bincode::serialize(dictionary.terms()).map_err(|e| unavailable(&paths.dictionary(), e))?;
    write_file(&paths.dictionary(), &bytes)
}

pub fn load_dictionary(paths: &IndexPaths) -> Result<TermDictionary, Error> {
    let buf = read_file(&paths.dictionary())?;
    let terms: Vec<String> =
        bincode::deserialize(&buf).map_err(|e| unavailable(&paths.dictionary(), e))?;
    Ok(TermDictionary::from_terms(terms))
}

pub fn save_postings(paths: &IndexPaths, postings: &PostingsStore) -> Result<(), Error> {
    create_dir_all(&paths.root).map_err(|e| unavailable(&paths.root, e))?;
    let rows: PostingsRows = postings.to_rows();
    let bytes = bincode::serialize(&rows).map_err(|e| unavailable(&paths.postings(), e))?;
    write_file(&paths.postings(), &bytes)
}

pub fn load_postings(paths: &IndexPaths) -> Result<PostingsStore, Error> {
    let buf = read_file(&paths.postings())?;
    let rows: PostingsRows =
        bincode::deserialize(&buf).map_err(|e| unavailable(&paths.postings(), e))?;
    Ok(PostingsStore::from_rows(rows))
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<(), Error> {
    create_dir_all(&paths.root).map_err(|e| unavailable(&paths.root, e))?;
    let json = serde_json::to_string_pretty(meta).map_err(|e| unavailable(&paths.meta(), e))?;
    write_file(&paths.meta(), json.as_bytes())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile, Error> {
    let buf = read_file(&paths.meta())?;
    serde_json::from_slice(&buf).map_err(|e| unavailable(&paths.meta(), e))
}

/// Persist the two logical tables plus the meta file.
pub fn save_index(paths: &IndexPaths, index: &Index, created_at: String) -> Result<(), Error> {
    save_dictionary(paths, &index.dictionary)?;
    save_postings(paths, &index.postings)?;
    let meta = MetaFile {
        num_docs: index.num_docs,
        num_terms: index.dictionary.len() as u32,
        created_at,
        version: FORMAT_VERSION,
    };
    save_meta(paths, &meta)
}

/// Load a persisted index for querying. Missing or unreadable tables fail
/// with [`Error::IndexUnavailable`].
pub fn load_index(paths: &IndexPaths) -> Result<Index, Error> {
    let dictionary = load_dictionary(paths)?;
    let postings = load_postings(paths)?;
    let meta = load_meta(paths)?;
    tracing::debug!(
        num_docs = meta.num_docs,
        num_terms = meta.num_terms,
        "loaded index"
    );
    Ok(Index { dictionary, postings, num_docs: meta.num_docs })
}
