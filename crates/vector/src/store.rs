//! Word2vec binary loader
//!
//! Layout:
//! - Header: `"<vocab_size> <dimension>\n"` in ASCII
//! - `vocab_size` records of `{token}' '{dimension x f32 little-endian}`
//!
//! Some dumps put a newline between records, some don't. Newlines in front
//! of a token are skipped.

use mcguess_common::{McGuessError, Result};
use ndarray::{Array1, ArrayView1};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Largest model accepted (2 GiB)
pub const MAX_MODEL_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Upper bound on a single token; anything longer means the cursor is misaligned
const MAX_TOKEN_BYTES: usize = 1024;

/// Two decimal numbers, a space and a newline fit comfortably
const MAX_HEADER_BYTES: usize = 64;

/// Immutable word -> vector table
#[derive(Debug, Clone, Default)]
pub struct WordVectorStore {
    vectors: HashMap<String, Array1<f64>>,
    dimension: Option<usize>,
}

/// Summary of a completed load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Records declared in the header
    pub declared: usize,
    /// Distinct words kept
    pub loaded: usize,
    /// Records dropped because the word was already present
    pub duplicates: usize,
    /// Vector dimension
    pub dimension: usize,
}

impl WordVectorStore {
    /// Load a word2vec binary model from disk
    ///
    /// Fails with [`McGuessError::SizeLimit`] if the file is larger than
    /// [`MAX_MODEL_BYTES`].
    pub fn from_bin(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bin_with_limit(path, MAX_MODEL_BYTES)
    }

    /// [`from_bin`](Self::from_bin) with a custom size ceiling in bytes
    pub fn from_bin_with_limit(path: impl AsRef<Path>, limit: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            McGuessError::resource(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let size = file.metadata()?.len();
        if size > limit {
            return Err(McGuessError::size_limit(format!(
                "Model {} is {} bytes, cannot be larger than {} bytes",
                path.display(),
                size,
                limit
            )));
        }

        info!("Loading word vectors from: {} ({} bytes)", path.display(), size);
        let started = Instant::now();

        let (store, stats) = Self::from_reader_with_limit(BufReader::new(file), limit)?;

        if stats.duplicates > 0 {
            warn!("Skipped {} duplicate words in {}", stats.duplicates, path.display());
        }
        info!(
            "Word vectors loaded: {} words, dimension {}, {:.1}s",
            stats.loaded,
            stats.dimension,
            started.elapsed().as_secs_f32()
        );

        Ok(store)
    }

    /// Parse a word2vec binary stream
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_stats(reader).map(|(store, _)| store)
    }

    /// Parse a word2vec binary stream, returning load statistics as well
    ///
    /// The stream is capped at [`MAX_MODEL_BYTES`].
    pub fn from_reader_with_stats<R: BufRead>(reader: R) -> Result<(Self, LoadStats)> {
        Self::from_reader_with_limit(reader, MAX_MODEL_BYTES)
    }

    /// Parse at most `limit` bytes of a word2vec binary stream
    ///
    /// A longer stream fails with a size limit error rather than being
    /// silently truncated, whether the ceiling falls inside a record or in
    /// trailing data after the last one.
    pub fn from_reader_with_limit<R: BufRead>(
        reader: R,
        limit: u64,
    ) -> Result<(Self, LoadStats)> {
        // One byte of slack: reaching it means the stream is over the ceiling
        let mut reader = reader.take(limit.saturating_add(1));

        let (vocab_size, dimension) = read_header(&mut reader, limit)?;

        // The header is untrusted; don't let it size the allocation outright
        let mut vectors = HashMap::with_capacity(vocab_size.min(1 << 20));
        let mut duplicates = 0;
        let mut raw = vec![0u8; 4 * dimension];

        for index in 0..vocab_size {
            let word =
                read_token(&mut reader, index).map_err(|e| over_limit(&reader, limit, e))?;

            // Exactly 4 * dimension bytes per record keeps the cursor aligned
            reader
                .read_exact(&mut raw)
                .map_err(|e| {
                    McGuessError::truncated(format!(
                        "Vector for '{}' (record {} of {}) is incomplete: {}",
                        word,
                        index + 1,
                        vocab_size,
                        e
                    ))
                })
                .map_err(|e| over_limit(&reader, limit, e))?;

            if vectors.contains_key(&word) {
                duplicates += 1;
                continue;
            }

            // Stored as f64: f32 loses too much precision in the dot products
            let vector: Array1<f64> = raw
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
                .collect();
            vectors.insert(word, vector);
        }

        // Trailing bytes still count towards the ceiling
        std::io::copy(&mut reader, &mut std::io::sink())?;
        if reader.limit() == 0 {
            return Err(size_limit_error(limit));
        }

        let stats = LoadStats {
            declared: vocab_size,
            loaded: vectors.len(),
            duplicates,
            dimension,
        };

        let dimension = (!vectors.is_empty()).then_some(dimension);
        Ok((Self { vectors, dimension }, stats))
    }

    /// Build a store from in-memory vectors (first occurrence of a word wins)
    ///
    /// All vectors must share one dimension.
    pub fn from_vectors<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut vectors = HashMap::new();
        let mut dimension = None;

        for (word, values) in entries {
            let word = word.into();
            match dimension {
                None => dimension = Some(values.len()),
                Some(d) if d != values.len() => {
                    return Err(McGuessError::format(format!(
                        "Vector for '{}' has dimension {}, expected {}",
                        word,
                        values.len(),
                        d
                    )));
                }
                Some(_) => {}
            }
            vectors.entry(word).or_insert_with(|| Array1::from(values));
        }

        Ok(Self { vectors, dimension })
    }

    /// Exact-match lookup; no case folding
    pub fn get(&self, word: &str) -> Option<ArrayView1<'_, f64>> {
        self.vectors.get(word).map(|v| v.view())
    }

    /// Whether the word exists in the space
    pub fn contains(&self, word: &str) -> bool {
        self.vectors.contains_key(word)
    }

    /// Vector dimension, `None` while the store is empty
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Vocabulary size
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Read `"<vocab_size> <dimension>\n"`
///
/// `limit` bounds the dimension: a record bigger than the whole model cannot
/// be valid.
fn read_header<R: BufRead>(reader: &mut R, limit: u64) -> Result<(usize, usize)> {
    let mut line = Vec::new();
    (&mut *reader)
        .take(MAX_HEADER_BYTES as u64)
        .read_until(b'\n', &mut line)?;

    if line.last() != Some(&b'\n') {
        if line.len() >= MAX_HEADER_BYTES {
            return Err(McGuessError::format(format!(
                "Header line is longer than {} bytes",
                MAX_HEADER_BYTES
            )));
        }
        return Err(McGuessError::format("Header line is not terminated by a newline"));
    }

    let header = String::from_utf8_lossy(&line);
    let header = header.trim_end_matches(['\n', '\r']);

    let (vocab, dim) = header.split_once(' ').ok_or_else(|| {
        McGuessError::format(format!("Expected a space in the first line of file '{}'", header))
    })?;

    let vocab_size = vocab.trim().parse::<usize>().map_err(|e| {
        McGuessError::format(format!("Invalid vocabulary size '{}': {}", vocab, e))
    })?;
    let dimension = dim.trim().parse::<usize>().map_err(|e| {
        McGuessError::format(format!("Invalid vector dimension '{}': {}", dim, e))
    })?;

    if dimension == 0 {
        return Err(McGuessError::format("Vector dimension cannot be 0"));
    }

    let record_bytes = dimension
        .checked_mul(4)
        .filter(|&bytes| bytes as u64 <= limit);
    if record_bytes.is_none() {
        return Err(McGuessError::format(format!(
            "Vector dimension {} does not fit in a {} byte model",
            dimension, limit
        )));
    }

    Ok((vocab_size, dimension))
}

fn size_limit_error(limit: u64) -> McGuessError {
    McGuessError::size_limit(format!("Model stream cannot be larger than {} bytes", limit))
}

/// A read that failed because the ceiling was hit is a size error, not truncation
fn over_limit<R>(reader: &std::io::Take<R>, limit: u64, err: McGuessError) -> McGuessError {
    if reader.limit() == 0 {
        size_limit_error(limit)
    } else {
        err
    }
}

/// Read a space-terminated token, skipping newlines
fn read_token<R: Read>(reader: &mut R, index: usize) -> Result<String> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        if reader.read(&mut byte)? == 0 {
            return Err(McGuessError::truncated(format!(
                "Unexpected end of data while reading word {}",
                index + 1
            )));
        }
        match byte[0] {
            b' ' => break,
            b'\n' => continue,
            b => bytes.push(b),
        }
        if bytes.len() > MAX_TOKEN_BYTES {
            return Err(McGuessError::format(format!(
                "Word {} is longer than {} bytes",
                index + 1,
                MAX_TOKEN_BYTES
            )));
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
