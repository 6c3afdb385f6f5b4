//! Search query document.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU32;

/// Terms more frequent than this share of documents are treated as
/// high-frequency and only used for scoring.
pub const CUTOFF_FREQUENCY: f64 = 0.001;

/// Default `index.max_result_window` of the cluster.
///
/// `from + size` beyond this is rejected by the cluster. The bound is a
/// caller contract and is not checked here.
pub const DEFAULT_MAX_RESULT_WINDOW: u64 = 10_000;

/// Page size used when none is given.
pub const DEFAULT_SIZE: NonZeroU32 = NonZeroU32::new(10).unwrap();

const SITE_FIELD: &str = "site";
const CONTENT_FIELD: &str = "content";
const TITLE_FIELD: &str = "title";

/// How low-frequency terms combine in a common-terms clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LowFreqOperator {
    /// Any term may match.
    Or,
    /// All terms must match.
    And,
}

/// A single query clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `{"match": {field: value}}`
    Match {
        /// Field name.
        field: String,
        /// Value to match.
        value: String,
    },
    /// `{"match_all": {}}`
    MatchAll,
    /// `{"common": {field: {"query", "cutoff_frequency", "low_freq_operator"}}}`
    Common {
        /// Field name.
        field: String,
        /// Query text.
        query: String,
        /// Frequency cutoff.
        cutoff_frequency: f64,
        /// Operator for low-frequency terms.
        low_freq_operator: LowFreqOperator,
    },
}

impl Clause {
    fn common(field: &str, query: &str) -> Self {
        Clause::Common {
            field: field.to_string(),
            query: query.to_string(),
            cutoff_frequency: CUTOFF_FREQUENCY,
            low_freq_operator: LowFreqOperator::Or,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
struct EmptyObject {}

#[derive(Serialize)]
struct CommonBody<'a> {
    query: &'a str,
    cutoff_frequency: f64,
    low_freq_operator: LowFreqOperator,
}

struct Single<'a, V>(&'a str, V);

impl<V: Serialize> Serialize for Single<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, &self.1)?;
        map.end()
    }
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Clause::Match { field, value } => {
                Single("match", Single(field, value)).serialize(serializer)
            }
            Clause::MatchAll => Single("match_all", EmptyObject {}).serialize(serializer),
            Clause::Common {
                field,
                query,
                cutoff_frequency,
                low_freq_operator,
            } => Single(
                "common",
                Single(
                    field,
                    CommonBody {
                        query,
                        cutoff_frequency: *cutoff_frequency,
                        low_freq_operator: *low_freq_operator,
                    },
                ),
            )
            .serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct SourceFilter {
    excludes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct BoolQuery {
    filter: Vec<Clause>,
    must: Vec<Clause>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    should: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct QueryRoot {
    #[serde(rename = "bool")]
    bool_query: BoolQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Highlight {
    fields: BTreeMap<String, EmptyObject>,
}

/// Search request body.
///
/// Serializes to:
///
/// ```json
/// {
///   "_source": {"excludes": ["content"]},
///   "from": 0,
///   "size": 10,
///   "query": {"bool": {"filter": [...], "must": [...], "should": [...]}},
///   "highlight": {"fields": {"content": {}}}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    #[serde(rename = "_source")]
    source: SourceFilter,
    from: u32,
    size: NonZeroU32,
    query: QueryRoot,
    highlight: Highlight,
    #[serde(skip)]
    site: String,
    #[serde(skip)]
    text: String,
}

impl SearchQuery {
    /// Build the standard site-scoped relevance query.
    ///
    /// Empty or whitespace-only `query_text` matches every document of the
    /// site.
    pub fn build(
        from: u32,
        size: NonZeroU32,
        site: impl Into<String>,
        query_text: impl Into<String>,
    ) -> Self {
        SearchQueryBuilder::new(site, query_text)
            .from(from)
            .size(size)
            .build()
    }

    /// Start a builder for a site and query text.
    pub fn builder(site: impl Into<String>, query_text: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder::new(site, query_text)
    }

    /// Result offset.
    pub fn from(&self) -> u32 {
        self.from
    }

    /// Page size.
    pub fn size(&self) -> NonZeroU32 {
        self.size
    }

    /// Site the results are restricted to.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Query text as given.
    pub fn query_text(&self) -> &str {
        &self.text
    }

    /// Whether this query matches every document of the site.
    pub fn is_match_all(&self) -> bool {
        self.query.bool_query.must == [Clause::MatchAll]
    }

    /// Fields with highlighted snippets.
    pub fn highlight_fields(&self) -> impl Iterator<Item = &str> {
        self.highlight.fields.keys().map(String::as_str)
    }

    /// Fields left out of returned `_source`.
    pub fn source_excludes(&self) -> &[String] {
        &self.source.excludes
    }

    /// Serialize to a JSON value.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Serialize to JSON bytes, the request body.
    pub fn to_body(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Builder for [`SearchQuery`].
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    site: String,
    text: String,
    from: u32,
    size: NonZeroU32,
    highlight: BTreeSet<String>,
    excludes: Vec<String>,
}

impl SearchQueryBuilder {
    /// Create a builder with offset 0, size 10, `content` highlighted and
    /// excluded from `_source`.
    pub fn new(site: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            text: query_text.into(),
            from: 0,
            size: DEFAULT_SIZE,
            highlight: BTreeSet::from([CONTENT_FIELD.to_string()]),
            excludes: vec![CONTENT_FIELD.to_string()],
        }
    }

    /// Set the result offset.
    pub fn from(mut self, from: u32) -> Self {
        self.from = from;
        self
    }

    /// Set the page size.
    pub fn size(mut self, size: NonZeroU32) -> Self {
        self.size = size;
        self
    }

    /// Request highlighted snippets for another field.
    pub fn highlight(mut self, field: impl Into<String>) -> Self {
        self.highlight.insert(field.into());
        self
    }

    /// Leave another field out of the returned `_source`.
    pub fn exclude_source(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.excludes.contains(&field) {
            self.excludes.push(field);
        }
        self
    }

    /// Build the query.
    pub fn build(self) -> SearchQuery {
        let text = self.text.trim();

        let (must, should) = if text.is_empty() {
            (vec![Clause::MatchAll], Vec::new())
        } else {
            (
                vec![Clause::common(CONTENT_FIELD, text)],
                vec![Clause::common(TITLE_FIELD, text)],
            )
        };

        SearchQuery {
            source: SourceFilter {
                excludes: self.excludes,
            },
            from: self.from,
            size: self.size,
            query: QueryRoot {
                bool_query: BoolQuery {
                    filter: vec![Clause::Match {
                        field: SITE_FIELD.to_string(),
                        value: self.site.clone(),
                    }],
                    must,
                    should,
                },
            },
            highlight: Highlight {
                fields: self
                    .highlight
                    .into_iter()
                    .map(|field| (field, EmptyObject {}))
                    .collect(),
            },
            site: self.site,
            text: self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn size(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_habitats_query_shape() {
        let query = SearchQuery::build(0, size(10), "datahub", "habitats");
        let json = query.to_json().unwrap();

        assert_eq!(json["query"]["bool"]["filter"][0]["match"]["site"], "datahub");

        let must = &json["query"]["bool"]["must"][0]["common"]["content"];
        assert_eq!(must["query"], "habitats");
        assert_eq!(must["cutoff_frequency"], json!(0.001));
        assert_eq!(must["low_freq_operator"], "or");

        let should = &json["query"]["bool"]["should"][0]["common"]["title"];
        assert_eq!(should["query"], "habitats");
        assert_eq!(should["cutoff_frequency"], json!(0.001));
        assert_eq!(should["low_freq_operator"], "or");
    }

    #[test]
    fn test_full_document() {
        let query = SearchQuery::build(20, size(5), "website", "marine protected areas");

        assert_eq!(
            query.to_json().unwrap(),
            json!({
                "_source": { "excludes": ["content"] },
                "from": 20,
                "size": 5,
                "query": {
                    "bool": {
                        "filter": [ { "match": { "site": "website" } } ],
                        "must": [
                            { "common": { "content": {
                                "query": "marine protected areas",
                                "cutoff_frequency": 0.001,
                                "low_freq_operator": "or"
                            } } }
                        ],
                        "should": [
                            { "common": { "title": {
                                "query": "marine protected areas",
                                "cutoff_frequency": 0.001,
                                "low_freq_operator": "or"
                            } } }
                        ]
                    }
                },
                "highlight": { "fields": { "content": {} } }
            })
        );
    }

    #[test]
    fn test_empty_text_matches_all_in_site() {
        for text in ["", "   "] {
            let query = SearchQuery::build(0, size(10), "sac", text);
            let json = query.to_json().unwrap();

            assert!(query.is_match_all());
            assert_eq!(json["query"]["bool"]["must"], json!([{ "match_all": {} }]));
            assert!(json["query"]["bool"].get("should").is_none());
            assert_eq!(json["query"]["bool"]["filter"][0]["match"]["site"], "sac");
        }
    }

    #[test]
    fn test_query_text_trimmed() {
        let query = SearchQuery::build(0, size(10), "mhc", "  seabirds ");
        let json = query.to_json().unwrap();

        assert_eq!(
            json["query"]["bool"]["must"][0]["common"]["content"]["query"],
            "seabirds"
        );
        assert_eq!(query.query_text(), "  seabirds ");
    }

    #[test]
    fn test_builder_extras() {
        let query = SearchQuery::builder("website", "otters")
            .highlight("title")
            .highlight("content")
            .exclude_source("content_base64")
            .exclude_source("content")
            .build();

        let fields: Vec<&str> = query.highlight_fields().collect();
        assert_eq!(fields, vec!["content", "title"]);
        assert_eq!(query.source_excludes(), ["content", "content_base64"]);
        assert_eq!(query.from(), 0);
        assert_eq!(query.size(), DEFAULT_SIZE);
    }

    #[test]
    fn test_site_value_escaped() {
        let query = SearchQuery::build(0, size(1), "web\"site", "a\"b");
        let body = query.to_body().unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(parsed["query"]["bool"]["filter"][0]["match"]["site"], "web\"site");
    }
}
