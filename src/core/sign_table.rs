// src/core/sign_table.rs
use crate::config::EngineConfig;
use crate::core::types::{sign_char, Canonical, Sign, SignId, PLACEHOLDER};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Consonant-leaning alphabet used for random renderings by default.
const RESTRICTED_ALPHABET: &str = "aiukgcjtdnpbmyrlvsmst";

/// IAST letters of the full phonetic alphabet, sampled per character.
const FULL_ALPHABET: &str = "aāiīuūoauṛṝḷḹaiauṃḥkkhgghṅcchjjhñṭṭhḍḍhṇtthddhnpphbbhmyrlvśṣshḻ";

/// A raw sign definition row: `sign, xlit, canonical, regex`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignRecord {
    pub sign: String,
    pub xlit: String,
    /// `None` when the input has no canonical column at all.
    pub canonical: Option<String>,
    pub regex: Option<String>,
}

impl SignRecord {
    pub fn new(sign: &str, xlit: &str, canonical: Option<&str>) -> Self {
        Self {
            sign: sign.to_string(),
            xlit: xlit.to_string(),
            canonical: canonical.map(str::to_string),
            regex: None,
        }
    }
}

/// Read-only lookup of sign metadata, built once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTable {
    signs: HashMap<SignId, Sign>,
    full_random: bool,
}

impl SignTable {
    pub fn get(&self, id: SignId) -> Option<&Sign> {
        self.signs.get(&id)
    }

    pub fn contains(&self, id: SignId) -> bool {
        self.signs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    /// Whether random symbols came from the full alphabet. Fixed at build time.
    pub fn full_random(&self) -> bool {
        self.full_random
    }

    /// Signs without a phonetic value, ordered by id.
    pub fn unknown_signs(&self) -> Vec<&Sign> {
        let mut unknown: Vec<&Sign> = self.signs.values().filter(|s| s.is_unknown()).collect();
        unknown.sort_by_key(|s| s.id);
        unknown
    }

    pub fn build(records: impl IntoIterator<Item = SignRecord>, config: &EngineConfig) -> Self {
        let mut builder = SignTableBuilder::new(config);
        for record in records {
            builder.add(&record);
        }
        builder.finish()
    }
}

#[cfg(test)]
impl SignTable {
    /// Table with hand-picked random symbols: `(id, spelling, random_symbol)`.
    pub(crate) fn with_symbols(signs: &[(SignId, &str, &str)], full_random: bool) -> Self {
        let signs = signs
            .iter()
            .map(|&(id, spelling, symbol)| {
                let sign = Sign {
                    id,
                    spelling: spelling.to_string(),
                    canonical: Canonical::Itself,
                    search_pattern: spelling.to_string(),
                    random_symbol: symbol.to_string(),
                };
                (id, sign)
            })
            .collect();
        Self { signs, full_random }
    }
}

/// Accumulates sign records into a [`SignTable`], drawing each sign's random
/// symbol as it is added.
pub struct SignTableBuilder {
    table: SignTable,
    alphabet: Vec<char>,
    rng: SmallRng,
}

impl SignTableBuilder {
    pub fn new(config: &EngineConfig) -> Self {
        let alphabet = if config.full_random {
            FULL_ALPHABET
        } else {
            RESTRICTED_ALPHABET
        };
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            table: SignTable {
                signs: HashMap::new(),
                full_random: config.full_random,
            },
            alphabet: alphabet.chars().collect(),
            rng,
        }
    }

    /// Adds one record. Rows whose id is not a number are skipped; a later
    /// row for the same id replaces the earlier one.
    pub fn add(&mut self, record: &SignRecord) {
        let Ok(id) = record.sign.trim().parse::<SignId>() else {
            warn!(sign = %record.sign, "skipping sign row with a non-numeric id");
            return;
        };

        let spelling = match record.xlit.trim() {
            "" => {
                debug!(id, "blank spelling, using placeholder");
                PLACEHOLDER.to_string()
            }
            xlit => xlit.to_string(),
        };
        let search_pattern = record
            .regex
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map_or_else(|| spelling.clone(), str::to_string);
        let canonical = parse_canonical(id, record.canonical.as_deref());
        let random_symbol = self.draw_symbol();

        self.table.signs.insert(
            id,
            Sign {
                id,
                spelling,
                canonical,
                search_pattern,
                random_symbol,
            },
        );
    }

    fn draw_symbol(&mut self) -> String {
        let idx = self.rng.gen_range(0..self.alphabet.len());
        self.alphabet[idx].to_string()
    }

    pub fn finish(self) -> SignTable {
        self.table
    }
}

/// An absent field or one naming the sign itself is self-canonical; a blank
/// field is unresolved; anything else is a hyphen-delimited id list.
fn parse_canonical(id: SignId, field: Option<&str>) -> Canonical {
    let field = match field.map(str::trim) {
        None => return Canonical::Itself,
        Some("") => return Canonical::Unresolved,
        Some(f) => f,
    };

    let parsed: Option<Vec<SignId>> = field
        .split('-')
        .map(|part| {
            part.trim()
                .parse::<SignId>()
                .ok()
                .filter(|&target| sign_char(target).is_some())
        })
        .collect();

    match parsed {
        Some(targets) if targets == [id] => Canonical::Itself,
        Some(targets) => Canonical::Substitute(targets),
        None => {
            warn!(id, canonical = field, "unparseable canonical form");
            Canonical::Unresolved
        }
    }
}
