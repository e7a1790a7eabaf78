//! In-memory inverted index with field boosting, prefix and fuzzy matching.
//!
//! The whole structure serializes to one JSON document so a site can ship it
//! as a static artifact and load it without re-tokenizing any content.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;
use std::time::Instant;
use tracing::{debug, warn};

use crate::fuzzy::{bounded_levenshtein, max_edits};
use crate::text::tokenize;
use crate::{
    CombineWith, DocRecord, Error, Field, Result, SearchHit, SearchOptions, StoredField,
    StoredFields, Suggestion,
};

/// Serialized format version; bumped whenever the JSON layout changes.
const FORMAT_VERSION: u32 = 1;

const BM25_K: f64 = 1.2;
const BM25_B: f64 = 0.7;
const BM25_DELTA: f64 = 0.5;
const PREFIX_WEIGHT: f64 = 0.375;
const FUZZY_WEIGHT: f64 = 0.45;

/// Which fields are tokenized and which are copied into the index.
///
/// The schema a serialized index was built with must be supplied again to
/// load it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    pub fields: Vec<Field>,
    pub store_fields: Vec<StoredField>,
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self {
            fields: Field::ALL.to_vec(),
            store_fields: vec![
                StoredField::Slug,
                StoredField::Title,
                StoredField::Section,
                StoredField::Tags,
                StoredField::Headings,
                StoredField::Description,
            ],
        }
    }
}

type Postings = BTreeMap<u32, u32>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndex {
    version: u32,
    schema: IndexSchema,
    next_short_id: u32,
    /// Internal short id to record id, in insertion order.
    document_ids: BTreeMap<u32, String>,
    field_lengths: BTreeMap<u32, BTreeMap<Field, u32>>,
    field_length_totals: BTreeMap<Field, u64>,
    stored_fields: BTreeMap<u32, StoredFields>,
    /// term -> field -> short id -> term frequency
    terms: BTreeMap<String, BTreeMap<Field, Postings>>,
    #[serde(skip)]
    short_ids: HashMap<String, u32>,
}

impl SearchIndex {
    pub fn new(schema: IndexSchema) -> Self {
        Self {
            version: FORMAT_VERSION,
            schema,
            next_short_id: 0,
            document_ids: BTreeMap::new(),
            field_lengths: BTreeMap::new(),
            field_length_totals: BTreeMap::new(),
            stored_fields: BTreeMap::new(),
            terms: BTreeMap::new(),
            short_ids: HashMap::new(),
        }
    }

    pub const fn schema(&self) -> &IndexSchema {
        &self.schema
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.document_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document_ids.is_empty()
    }

    /// Number of distinct terms in the dictionary.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.short_ids.contains_key(id)
    }

    /// Index one record.
    ///
    /// A record whose id is already indexed replaces the earlier document.
    /// Returns `true` when that happened.
    pub fn add(&mut self, record: &DocRecord) -> bool {
        let replaced = self.remove(&record.id);
        if replaced {
            warn!("Duplicate document id '{}': later record replaces earlier one", record.id);
        }

        let short_id = self.next_short_id;
        self.next_short_id += 1;

        let mut lengths = BTreeMap::new();
        for &field in &self.schema.fields {
            let tokens: Vec<String> = field
                .values(record)
                .into_iter()
                .flat_map(tokenize)
                .collect();

            let length = u32::try_from(tokens.len()).unwrap_or(u32::MAX);
            lengths.insert(field, length);
            *self.field_length_totals.entry(field).or_insert(0) += u64::from(length);

            for token in tokens {
                *self
                    .terms
                    .entry(token)
                    .or_default()
                    .entry(field)
                    .or_default()
                    .entry(short_id)
                    .or_insert(0) += 1;
            }
        }

        self.field_lengths.insert(short_id, lengths);
        self.stored_fields
            .insert(short_id, StoredFields::capture(record, &self.schema.store_fields));
        self.document_ids.insert(short_id, record.id.clone());
        self.short_ids.insert(record.id.clone(), short_id);

        replaced
    }

    /// Index every record in order. Returns how many replaced an earlier id.
    pub fn add_all<'a, I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = &'a DocRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.add(record))
            .count()
    }

    /// Drop a document and all of its postings.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(short_id) = self.short_ids.remove(id) else {
            return false;
        };

        self.document_ids.remove(&short_id);
        self.stored_fields.remove(&short_id);
        if let Some(lengths) = self.field_lengths.remove(&short_id) {
            for (field, length) in lengths {
                if let Some(total) = self.field_length_totals.get_mut(&field) {
                    *total = total.saturating_sub(u64::from(length));
                }
            }
        }

        self.terms.retain(|_, fields| {
            fields.retain(|_, postings| {
                postings.remove(&short_id);
                !postings.is_empty()
            });
            !fields.is_empty()
        });

        true
    }

    /// Serialize the full index state.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load an index produced by [`SearchIndex::to_json`].
    ///
    /// Fails when the JSON is unusable or was built with a different schema.
    pub fn from_json(json: &str, schema: &IndexSchema) -> Result<Self> {
        let mut index: Self = serde_json::from_str(json)
            .map_err(|e| Error::Index(format!("Failed to parse serialized index: {e}")))?;

        if index.version != FORMAT_VERSION {
            return Err(Error::Index(format!(
                "Unsupported index format version {} (expected {FORMAT_VERSION})",
                index.version
            )));
        }

        if &index.schema != schema {
            return Err(Error::Index(format!(
                "Index schema mismatch: built with {:?}, loaded with {:?}",
                index.schema, schema
            )));
        }

        index.short_ids = index
            .document_ids
            .iter()
            .map(|(short_id, id)| (id.clone(), *short_id))
            .collect();

        Ok(index)
    }

    /// Run a ranked query.
    ///
    /// Every hit is returned, best first; ties keep insertion order. The
    /// `limit` in `options` is applied by callers that present results.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
        let started = Instant::now();
        let query_terms = unique_terms(query);
        if query_terms.is_empty() || self.is_empty() {
            return Vec::new();
        }

        let doc_count = self.len() as f64;
        let mut matches: BTreeMap<u32, DocumentMatch> = BTreeMap::new();

        for (query_idx, query_term) in query_terms.iter().enumerate() {
            for (term, weight) in self.expand_term(query_term, options) {
                let Some(fields) = self.terms.get(term) else {
                    continue;
                };

                for (&field, postings) in fields {
                    let boost = options.boost.get(field);
                    let doc_freq = postings.len() as f64;
                    let avg_length = self.average_field_length(field);

                    for (&short_id, &term_freq) in postings {
                        let field_length = self.field_length(short_id, field);
                        let score = boost
                            * weight
                            * bm25_plus(
                                f64::from(term_freq),
                                doc_freq,
                                doc_count,
                                field_length,
                                avg_length,
                            );

                        let entry = matches.entry(short_id).or_default();
                        entry.score += score;
                        entry.query_terms.insert(query_idx);
                        entry
                            .fields
                            .entry(term.to_string())
                            .or_default()
                            .insert(field);
                    }
                }
            }
        }

        let required = match options.combine_with {
            CombineWith::Or => 1,
            CombineWith::And => query_terms.len(),
        };

        let mut hits: Vec<SearchHit> = matches
            .into_iter()
            .filter(|(_, m)| m.query_terms.len() >= required)
            .filter_map(|(short_id, m)| {
                let id = self.document_ids.get(&short_id)?.clone();
                let stored = self.stored_fields.get(&short_id).cloned().unwrap_or_default();
                Some(SearchHit {
                    id,
                    score: m.score,
                    terms: m.fields.keys().cloned().collect(),
                    matches: m
                        .fields
                        .into_iter()
                        .map(|(term, fields)| (term, fields.into_iter().collect()))
                        .collect(),
                    stored,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            "Found {} hits for query '{}' in {:.2}ms",
            hits.len(),
            query,
            started.elapsed().as_secs_f64() * 1000.0
        );

        hits
    }

    /// Rank query completions.
    ///
    /// Hits are grouped by the phrase their matched terms form; a phrase
    /// scores the mean of its hits.
    pub fn auto_suggest(&self, query: &str, options: &SearchOptions) -> Vec<Suggestion> {
        let mut groups: Vec<(String, Vec<String>, f64, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for hit in self.search(query, options) {
            let phrase = hit.terms.join(" ");
            if let Some(&pos) = positions.get(&phrase) {
                groups[pos].2 += hit.score;
                groups[pos].3 += 1;
            } else {
                positions.insert(phrase.clone(), groups.len());
                groups.push((phrase, hit.terms, hit.score, 1));
            }
        }

        let mut suggestions: Vec<Suggestion> = groups
            .into_iter()
            .map(|(suggestion, terms, total, count)| Suggestion {
                suggestion,
                terms,
                score: total / count as f64,
            })
            .collect();

        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
        suggestions
    }

    /// Index terms a query term reaches, each with its best match weight.
    fn expand_term<'a>(&'a self, query_term: &str, options: &SearchOptions) -> BTreeMap<&'a str, f64> {
        let mut candidates: BTreeMap<&'a str, f64> = BTreeMap::new();
        let query_len = query_term.chars().count() as f64;

        if let Some((term, _)) = self.terms.get_key_value(query_term) {
            candidates.insert(term.as_str(), 1.0);
        }

        if options.prefix {
            let range = self
                .terms
                .range::<str, _>((Bound::Included(query_term), Bound::Unbounded));
            for (term, _) in range.take_while(|(term, _)| term.starts_with(query_term)) {
                if term == query_term {
                    continue;
                }
                let distance = term.chars().count() as f64 - query_len;
                let weight = PREFIX_WEIGHT * query_len / (query_len + 0.3 * distance);
                keep_best(&mut candidates, term, weight);
            }
        }

        let max_distance = max_edits(query_term.chars().count(), options.fuzzy);
        if max_distance > 0 {
            for term in self.terms.keys() {
                if let Some(distance) = bounded_levenshtein(query_term, term, max_distance) {
                    if distance == 0 {
                        continue;
                    }
                    let weight = FUZZY_WEIGHT * query_len / (query_len + distance as f64);
                    keep_best(&mut candidates, term, weight);
                }
            }
        }

        candidates
    }

    fn field_length(&self, short_id: u32, field: Field) -> f64 {
        self.field_lengths
            .get(&short_id)
            .and_then(|lengths| lengths.get(&field))
            .map_or(0.0, |&len| f64::from(len))
    }

    fn average_field_length(&self, field: Field) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let total = self.field_length_totals.get(&field).copied().unwrap_or(0);
        total as f64 / self.len() as f64
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new(IndexSchema::default())
    }
}

#[derive(Default)]
struct DocumentMatch {
    score: f64,
    query_terms: BTreeSet<usize>,
    fields: BTreeMap<String, BTreeSet<Field>>,
}

fn unique_terms(query: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    tokenize(query)
        .into_iter()
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

fn keep_best<'a>(candidates: &mut BTreeMap<&'a str, f64>, term: &'a str, weight: f64) {
    let entry = candidates.entry(term).or_insert(weight);
    if weight > *entry {
        *entry = weight;
    }
}

/// BM25+ relevance of one term in one field of one document.
fn bm25_plus(
    term_freq: f64,
    doc_freq: f64,
    doc_count: f64,
    field_length: f64,
    avg_field_length: f64,
) -> f64 {
    let inverse_doc_freq = (1.0 + (doc_count - doc_freq + 0.5) / (doc_freq + 0.5)).ln();
    let length_ratio = if avg_field_length > 0.0 {
        field_length / avg_field_length
    } else {
        1.0
    };
    inverse_doc_freq
        * (BM25_DELTA
            + term_freq * (BM25_K + 1.0)
                / (term_freq + BM25_K * (1.0 - BM25_B + BM25_B * length_ratio)))
}
