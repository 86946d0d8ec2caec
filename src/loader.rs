use crate::consts::DEFAULT_BATCH_SIZE;
use crate::error::{KcResult, KeyComfortError};
use crate::layout::{LayoutModel, RawRuleTable};
use serde_json::{Number, Value};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RulesFormat {
    #[default]
    Json,
    Csv,
}

/// Loads a rule table and names the layout after the file stem.
pub fn load_layout<P: AsRef<Path>>(
    path: P,
    format: RulesFormat,
    csv_delimiter: u8,
) -> KcResult<LayoutModel> {
    let path = path.as_ref();
    info!("📂 Loading rules: {}", path.display());

    let layout = match format {
        RulesFormat::Json => {
            let content = fs::read_to_string(path)?;
            let doc: Value = serde_json::from_str(&content)?;
            LayoutModel::from_json_value(&doc)?
        }
        RulesFormat::Csv => LayoutModel::parse(&load_rules_csv(path, csv_delimiter)?)?,
    };

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(layout.with_name(name))
}

/// Reads `symbol,penalty[,finger]` rows into a raw table.
///
/// A first row is treated as a header only when its penalty column is not a
/// number and its symbol column is not a single character. Any other
/// non-numeric penalty is kept as a string so validation rejects it.
pub fn load_rules_csv<P: AsRef<Path>>(path: P, delimiter: u8) -> KcResult<RawRuleTable> {
    let file = File::open(path)?;
    read_rules_csv(file, delimiter)
}

pub fn read_rules_csv<R: Read>(reader: R, delimiter: u8) -> KcResult<RawRuleTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut table = RawRuleTable::new();
    let mut skipped = 0usize;

    for (row_idx, result) in rdr.records().enumerate() {
        let rec = result?;
        if rec.len() < 2 {
            skipped += 1;
            continue;
        }

        let raw_symbol = &rec[0];
        let symbol = if raw_symbol.trim().is_empty() {
            raw_symbol
        } else {
            raw_symbol.trim()
        };

        let penalty_raw = rec[1].trim();
        let penalty = match penalty_raw.parse::<f64>().ok().and_then(Number::from_f64) {
            Some(n) => Value::Number(n),
            None if row_idx == 0 && symbol.chars().count() != 1 => {
                debug!("Skipping CSV header row");
                continue;
            }
            None => Value::String(penalty_raw.to_string()),
        };

        let value = match rec.get(2).map(str::trim) {
            Some(tag) => Value::Array(vec![penalty, Value::String(tag.to_string())]),
            None => penalty,
        };
        table.insert(symbol.to_string(), value);
    }

    if skipped > 0 {
        warn!("⚠️  Skipped {} short rows in rule table.", skipped);
    }
    Ok(table)
}

pub fn load_words<P: AsRef<Path>>(path: P) -> KcResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content.split_whitespace().map(str::to_string).collect())
}

pub fn load_text<P: AsRef<Path>>(path: P) -> KcResult<String> {
    Ok(fs::read_to_string(path)?)
}

/// Number of whitespace-delimited words, used as a progress hint.
pub fn count_words<R: BufRead>(reader: R) -> KcResult<u64> {
    let mut total = 0u64;
    for batch in WordBatches::new(reader, DEFAULT_BATCH_SIZE) {
        total += batch?.len() as u64;
    }
    Ok(total)
}

/// Yields whitespace-delimited words in batches of at most `batch_size`.
///
/// Input is scanned through the reader's buffer, so memory stays bounded by
/// the batch and the longest word rather than the longest line.
pub struct WordBatches<R> {
    reader: R,
    batch_size: usize,
    word: Vec<u8>,
    pending: Vec<String>,
    eof: bool,
}

impl<R: BufRead> WordBatches<R> {
    pub fn new(reader: R, batch_size: usize) -> Self {
        Self {
            reader,
            batch_size: batch_size.max(1),
            word: Vec::new(),
            pending: Vec::new(),
            eof: false,
        }
    }

    fn fail(&mut self, e: io::Error) -> Option<KcResult<Vec<String>>> {
        self.eof = true;
        self.pending.clear();
        self.word.clear();
        Some(Err(e.into()))
    }
}

impl WordBatches<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, batch_size: usize) -> KcResult<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?), batch_size))
    }
}

// Non-ASCII whitespace inside a token still splits it.
fn flush_word(word: &mut Vec<u8>, pending: &mut Vec<String>) -> io::Result<()> {
    if word.is_empty() {
        return Ok(());
    }
    let token = String::from_utf8(std::mem::take(word))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    pending.extend(token.split_whitespace().map(str::to_string));
    Ok(())
}

impl<R: BufRead> Iterator for WordBatches<R> {
    type Item = KcResult<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.eof && self.pending.len() < self.batch_size {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return self.fail(e),
            };
            if buf.is_empty() {
                self.eof = true;
                if let Err(e) = flush_word(&mut self.word, &mut self.pending) {
                    return self.fail(e);
                }
                break;
            }

            let mut used = 0;
            let mut failed = None;
            for &b in buf {
                used += 1;
                if !b.is_ascii_whitespace() {
                    self.word.push(b);
                    continue;
                }
                if let Err(e) = flush_word(&mut self.word, &mut self.pending) {
                    failed = Some(e);
                    break;
                }
                if self.pending.len() >= self.batch_size {
                    break;
                }
            }
            self.reader.consume(used);
            if let Some(e) = failed {
                return self.fail(e);
            }
        }

        if self.pending.is_empty() {
            return None;
        }
        let cut = self.batch_size.min(self.pending.len());
        let rest = self.pending.split_off(cut);
        Some(Ok(std::mem::replace(&mut self.pending, rest)))
    }
}

/// Yields UTF-8 text in chunks of at most `chunk_size` bytes. Chunks never
/// split a character but may split a word.
pub struct TextChunks<R> {
    reader: R,
    chunk_size: usize,
    carry: Vec<u8>,
    done: bool,
}

impl<R: Read> TextChunks<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            // Room for at least one full UTF-8 sequence.
            chunk_size: chunk_size.max(4),
            carry: Vec::new(),
            done: false,
        }
    }
}

impl TextChunks<File> {
    pub fn open<P: AsRef<Path>>(path: P, chunk_size: usize) -> KcResult<Self> {
        Ok(Self::new(File::open(path)?, chunk_size))
    }
}

fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn invalid_utf8() -> KeyComfortError {
    KeyComfortError::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        "text stream is not valid UTF-8",
    ))
}

impl<R: Read> Iterator for TextChunks<R> {
    type Item = KcResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut bytes = std::mem::take(&mut self.carry);
        let start = bytes.len();
        bytes.resize(self.chunk_size.max(start + 1), 0);
        let n = match fill(&mut self.reader, &mut bytes[start..]) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        };
        bytes.truncate(start + n);

        if n == 0 {
            self.done = true;
            if bytes.is_empty() {
                return None;
            }
            // Leftover bytes at EOF can only be a truncated character.
            return Some(Err(invalid_utf8()));
        }

        match std::str::from_utf8(&bytes) {
            Ok(_) => {}
            Err(e) if e.error_len().is_none() => {
                self.carry = bytes.split_off(e.valid_up_to());
            }
            Err(_) => {
                self.done = true;
                return Some(Err(invalid_utf8()));
            }
        }
        Some(String::from_utf8(bytes).map_err(|_| invalid_utf8()))
    }
}
