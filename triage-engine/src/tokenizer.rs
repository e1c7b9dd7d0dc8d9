//! WordPiece tokenizer for the text scorer
//!
//! Produces fixed-length `input_ids` / `attention_mask` pairs in the layout
//! BERT-family classifiers expect: `[CLS] tokens... [SEP] [PAD]...`.

use std::collections::HashMap;

use crate::error::{TriageError, TriageResult};

pub const PAD_TOKEN: &str = "[PAD]";
pub const UNK_TOKEN: &str = "[UNK]";
pub const CLS_TOKEN: &str = "[CLS]";
pub const SEP_TOKEN: &str = "[SEP]";
pub const MASK_TOKEN: &str = "[MASK]";

const DEFAULT_VOCAB_SIZE: usize = 5000;
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

const COMMON_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on", "with", "he",
    "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we", "say", "her", "she", "or",
    "an", "will", "my", "one", "all", "would", "there", "their",
    // clinical terms
    "fever", "cough", "headache", "pain", "ache", "symptom", "symptoms", "patient", "disease", "abdominal",
    "chest", "back", "joint", "muscle", "throat", "nose", "eye", "ear", "nausea", "vomiting", "diarrhea",
    "constipation", "rash", "itching", "swelling", "breath", "breathing", "shortness", "difficulty",
    "fatigue", "weakness", "dizziness", "common", "cold", "flu", "infection", "bacterial", "viral",
    "chronic", "acute",
];

/// Model inputs for one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct WordPieceTokenizer {
    vocab: HashMap<String, i64>,
    max_length: usize,
    pad_id: i64,
    unk_id: i64,
    cls_id: i64,
    sep_id: i64,
}

impl WordPieceTokenizer {
    /// Tokenizer over an ordered token list; a token's id is its position
    pub fn new(tokens: Vec<String>, max_length: usize) -> TriageResult<Self> {
        if max_length < 2 {
            return Err(TriageError::Tokenizer(format!(
                "max_length {} cannot hold [CLS] and [SEP]",
                max_length
            )));
        }
        let vocab: HashMap<String, i64> = tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t, i as i64))
            .collect();
        let lookup = |token: &str, default: i64| vocab.get(token).copied().unwrap_or(default);
        let pad_id = lookup(PAD_TOKEN, 0);
        let unk_id = lookup(UNK_TOKEN, 100);
        let cls_id = lookup(CLS_TOKEN, 101);
        let sep_id = lookup(SEP_TOKEN, 102);

        Ok(Self {
            vocab,
            max_length,
            pad_id,
            unk_id,
            cls_id,
            sep_id,
        })
    }

    /// Built-in vocabulary with the standard BERT special-token ids
    pub fn standard(max_length: usize) -> TriageResult<Self> {
        Self::new(default_vocabulary(), max_length)
    }

    /// Parse a `vocab.txt` file body, one token per line
    pub fn from_vocab_text(text: &str, max_length: usize) -> TriageResult<Self> {
        let tokens: Vec<String> = text.lines().map(|l| l.trim_end_matches('\r').to_string()).collect();
        if tokens.iter().all(|t| t.is_empty()) {
            return Err(TriageError::Tokenizer("vocabulary is empty".to_string()));
        }
        Self::new(tokens, max_length)
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn token_id(&self, token: &str) -> i64 {
        self.vocab.get(token).copied().unwrap_or(self.unk_id)
    }

    /// Word pieces for a whole text, without special tokens
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.trim().to_lowercase();
        let mut pieces = Vec::new();
        let mut word = String::new();

        for c in lower.chars() {
            if c.is_whitespace() {
                self.flush(&mut word, &mut pieces);
            } else if PUNCTUATION.contains(c) {
                self.flush(&mut word, &mut pieces);
                pieces.push(c.to_string());
            } else {
                word.push(c);
            }
        }
        self.flush(&mut word, &mut pieces);
        pieces
    }

    fn flush(&self, word: &mut String, pieces: &mut Vec<String>) {
        if !word.is_empty() {
            pieces.extend(self.word_pieces(word));
            word.clear();
        }
    }

    /// Greedy longest-match split; continuation pieces carry `##`
    fn word_pieces(&self, word: &str) -> Vec<String> {
        if self.vocab.contains_key(word) {
            return vec![word.to_string()];
        }

        let chars: Vec<char> = word.chars().collect();
        let mut pieces = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let mut end = chars.len();
            let mut matched = None;
            while end > start {
                let body: String = chars[start..end].iter().collect();
                let candidate = if start > 0 { format!("##{}", body) } else { body };
                if self.vocab.contains_key(&candidate) {
                    matched = Some(candidate);
                    break;
                }
                end -= 1;
            }

            match matched {
                Some(piece) => {
                    pieces.push(piece);
                    start = end;
                }
                None => {
                    if start == 0 {
                        pieces.push(UNK_TOKEN.to_string());
                    } else {
                        pieces.push(format!("##{}", chars[start]));
                    }
                    start += 1;
                }
            }
        }
        pieces
    }

    /// Fixed-length encoding: truncated so `[SEP]` stays last, then padded
    pub fn encode(&self, text: &str) -> Encoding {
        let mut input_ids = Vec::with_capacity(self.max_length);
        input_ids.push(self.cls_id);
        input_ids.extend(self.tokenize(text).iter().map(|t| self.token_id(t)));
        input_ids.push(self.sep_id);

        if input_ids.len() > self.max_length {
            input_ids.truncate(self.max_length - 1);
            input_ids.push(self.sep_id);
        }

        let mut attention_mask = vec![1; input_ids.len()];
        input_ids.resize(self.max_length, self.pad_id);
        attention_mask.resize(self.max_length, 0);

        Encoding {
            input_ids,
            attention_mask,
        }
    }
}

/// Default token list: specials at their BERT ids, clinical words, numbers,
/// printable ASCII, then filler up to the fixed size
pub fn default_vocabulary() -> Vec<String> {
    let mut tokens: Vec<String> = Vec::with_capacity(DEFAULT_VOCAB_SIZE);
    tokens.push(PAD_TOKEN.to_string());
    tokens.extend((0..20).map(|i| format!("[unused{}]", i)));
    while tokens.len() < 100 {
        tokens.push(format!("[unused{}]", tokens.len()));
    }
    for special in [UNK_TOKEN, CLS_TOKEN, SEP_TOKEN, MASK_TOKEN] {
        tokens.push(special.to_string());
    }

    let push_new = |tokens: &mut Vec<String>, token: String| {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    };
    for word in COMMON_WORDS {
        push_new(&mut tokens, word.to_string());
    }
    for n in 0..1000 {
        push_new(&mut tokens, n.to_string());
    }
    for code in 32u8..127 {
        push_new(&mut tokens, char::from(code).to_string());
    }
    while tokens.len() < DEFAULT_VOCAB_SIZE {
        tokens.push(format!("##token{}", tokens.len()));
    }
    tokens
}
