//! Part-of-speech tagging
//!
//! Taggers keep per-call buffers and context, so one instance must never be
//! used by two requests at once. [`TaggerPool`] hands out instances
//! exclusively and takes them back when the guard drops.

use mcguess_common::{McGuessError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Assigns one part-of-speech tag per token
pub trait PosTagger: Send {
    /// Tags aligned 1:1 with `tokens`
    ///
    /// The returned slice borrows the tagger's internal buffer.
    fn tag(&mut self, tokens: &[String]) -> &[String];
}

/// Closed-class words tagged without a model entry (Penn Treebank tags)
const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    ("a", "DT"), ("an", "DT"), ("the", "DT"), ("this", "DT"), ("that", "DT"),
    ("these", "DT"), ("those", "DT"), ("each", "DT"), ("every", "DT"), ("some", "DT"),
    ("any", "DT"), ("no", "DT"), ("all", "PDT"), ("both", "DT"), ("either", "DT"),
    ("and", "CC"), ("or", "CC"), ("but", "CC"), ("nor", "CC"), ("yet", "CC"),
    ("of", "IN"), ("in", "IN"), ("on", "IN"), ("at", "IN"), ("by", "IN"), ("for", "IN"),
    ("with", "IN"), ("from", "IN"), ("into", "IN"), ("about", "IN"), ("than", "IN"),
    ("over", "IN"), ("under", "IN"), ("after", "IN"), ("before", "IN"), ("between", "IN"),
    ("through", "IN"), ("during", "IN"), ("because", "IN"), ("if", "IN"), ("while", "IN"),
    ("to", "TO"), ("there", "EX"),
    ("i", "PRP"), ("you", "PRP"), ("he", "PRP"), ("she", "PRP"), ("it", "PRP"),
    ("we", "PRP"), ("they", "PRP"), ("me", "PRP"), ("him", "PRP"), ("her", "PRP$"),
    ("us", "PRP"), ("them", "PRP"), ("my", "PRP$"), ("your", "PRP$"), ("his", "PRP$"),
    ("its", "PRP$"), ("our", "PRP$"), ("their", "PRP$"),
    ("can", "MD"), ("could", "MD"), ("will", "MD"), ("would", "MD"), ("shall", "MD"),
    ("should", "MD"), ("may", "MD"), ("might", "MD"), ("must", "MD"), ("cannot", "MD"),
    ("is", "VBZ"), ("are", "VBP"), ("am", "VBP"), ("was", "VBD"), ("were", "VBD"),
    ("be", "VB"), ("been", "VBN"), ("being", "VBG"), ("has", "VBZ"), ("have", "VBP"),
    ("had", "VBD"), ("does", "VBZ"), ("do", "VBP"), ("did", "VBD"),
    ("not", "RB"), ("very", "RB"),
    ("what", "WP"), ("who", "WP"), ("whom", "WP"), ("whose", "WP$"), ("which", "WDT"),
    ("when", "WRB"), ("where", "WRB"), ("why", "WRB"), ("how", "WRB"),
    ("oh", "UH"), ("yes", "UH"),
];

/// Word -> tag model shared by every tagger instance
#[derive(Debug, Clone, Default)]
pub struct PosLexicon {
    entries: HashMap<String, String>,
}

impl PosLexicon {
    /// Closed-class entries only
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ENTRIES.iter().copied())
    }

    pub fn from_pairs<I, W, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: AsRef<str>,
        T: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(w, t)| (w.as_ref().to_lowercase(), t.into()))
                .collect(),
        }
    }

    /// Load `word<TAB>TAG` lines on top of the builtin entries
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            McGuessError::resource(format!(
                "Failed to open POS lexicon {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut lexicon = Self::builtin();
        let added = lexicon.extend_from_reader(BufReader::new(file)).map_err(|e| {
            McGuessError::resource(format!("Invalid POS lexicon {}: {}", path.display(), e))
        })?;

        info!(
            "POS lexicon loaded: {} entries from {} ({} total)",
            added,
            path.display(),
            lexicon.len()
        );
        Ok(lexicon)
    }

    /// Merge `word<TAB>TAG` lines; `#` starts a comment line
    ///
    /// Returns the number of lines read.
    pub fn extend_from_reader<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut added = 0;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (word, tag) = line
                .split_once('\t')
                .map(|(w, t)| (w.trim(), t.trim()))
                .filter(|(w, t)| !w.is_empty() && !t.is_empty())
                .ok_or_else(|| {
                    McGuessError::format(format!(
                        "line {}: expected word<TAB>TAG, got '{}'",
                        line_no + 1,
                        line
                    ))
                })?;

            self.entries.insert(word.to_lowercase(), tag.to_string());
            added += 1;
        }
        Ok(added)
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lexicon lookup with suffix and context fallbacks for unknown words
#[derive(Debug)]
pub struct LexiconTagger {
    lexicon: Arc<PosLexicon>,
    tags: Vec<String>,
}

impl LexiconTagger {
    pub fn new(lexicon: Arc<PosLexicon>) -> Self {
        Self {
            lexicon,
            tags: Vec::new(),
        }
    }

    fn guess_tag(token: &str, position: usize, previous: Option<&str>) -> &'static str {
        let lower = token.to_lowercase();

        if token.chars().all(|c| c == '.') {
            return ".";
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            return "CD";
        }
        if previous == Some("TO") || previous == Some("MD") {
            return "VB";
        }
        if position > 0 && token.chars().next().is_some_and(char::is_uppercase) {
            return "NNP";
        }
        if lower.len() > 4 && lower.ends_with("ly") {
            return "RB";
        }
        if lower.len() > 4 && lower.ends_with("ing") {
            return "VBG";
        }
        if lower.len() > 3 && lower.ends_with("ed") {
            return "VBD";
        }
        if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
            return "NNS";
        }
        "NN"
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&mut self, tokens: &[String]) -> &[String] {
        self.tags.clear();

        for (position, token) in tokens.iter().enumerate() {
            let previous = self.tags.last().map(String::as_str);
            let tag = match self.lexicon.get(&token.to_lowercase()) {
                Some(tag) => tag.to_string(),
                None => Self::guess_tag(token, position, previous).to_string(),
            };
            self.tags.push(tag);
        }

        &self.tags
    }
}

/// Builds a fresh tagger when the pool runs dry
pub type TaggerFactory = Arc<dyn Fn() -> Box<dyn PosTagger> + Send + Sync>;

/// Pool of tagger instances, each checked out by one request at a time
pub struct TaggerPool {
    idle: Mutex<Vec<Box<dyn PosTagger>>>,
    factory: TaggerFactory,
    created: AtomicUsize,
}

impl TaggerPool {
    /// Create a pool with `warm` instances built up front
    pub fn new(factory: TaggerFactory, warm: usize) -> Self {
        let idle: Vec<_> = (0..warm).map(|_| factory()).collect();
        Self {
            idle: Mutex::new(idle),
            factory,
            created: AtomicUsize::new(warm),
        }
    }

    /// Pool of [`LexiconTagger`]s sharing one lexicon
    pub fn lexicon(lexicon: Arc<PosLexicon>, warm: usize) -> Self {
        let factory: TaggerFactory =
            Arc::new(move || Box::new(LexiconTagger::new(lexicon.clone())) as Box<dyn PosTagger>);
        Self::new(factory, warm)
    }

    /// Take an idle tagger, or build one if all are in use
    pub fn checkout(&self) -> PooledTagger<'_> {
        let idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop();
        let tagger = idle.unwrap_or_else(|| {
            let total = self.created.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("Tagger pool exhausted, creating instance #{}", total);
            (self.factory)()
        });

        PooledTagger {
            tagger: Some(tagger),
            pool: self,
        }
    }

    /// Number of idle instances
    pub fn idle(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of instances ever created
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    fn give_back(&self, tagger: Box<dyn PosTagger>) {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tagger);
    }
}

impl std::fmt::Debug for TaggerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggerPool")
            .field("idle", &self.idle())
            .field("created", &self.created())
            .finish()
    }
}

/// Exclusive handle on a pooled tagger; returned to the pool on drop
pub struct PooledTagger<'a> {
    tagger: Option<Box<dyn PosTagger>>,
    pool: &'a TaggerPool,
}

impl Deref for PooledTagger<'_> {
    type Target = dyn PosTagger;

    fn deref(&self) -> &Self::Target {
        // Only emptied in drop
        self.tagger.as_deref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for PooledTagger<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.tagger.as_deref_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PooledTagger<'_> {
    fn drop(&mut self) {
        if let Some(tagger) = self.tagger.take() {
            self.pool.give_back(tagger);
        }
    }
}
