//! Search configuration and SQL planning.
//!
//! Every keyword search runs through one generalized operation driven by a
//! [`SearchConfig`]. The legacy entry points of the store are thin presets
//! over this type; each preset pins a field/strategy/pagination combination
//! with its historical quirks (pass order, dedup or not, ordering or not)
//! intact, because the variants deliberately trade duplicates and ordering
//! against the full-text index differently.

use crate::error::StoreError;
use crate::tables::ListTable;

/// Default pagination offset of the subject full-text preset. Overridable
/// per call; no other preset inherits it.
pub const SUBJECT_INDEX_DEFAULT_OFFSET: i64 = 300;

/// Which columns a search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Subject,
    Content,
    /// Content and subject together.
    ContentSubject,
    /// Sender display name and sender address together.
    Sender,
}

impl SearchField {
    fn columns(self) -> &'static [&'static str] {
        match self {
            SearchField::Subject => &["subject"],
            SearchField::Content => &["content"],
            SearchField::ContentSubject => &["content", "subject"],
            SearchField::Sender => &["sender", "email"],
        }
    }
}

/// How the match is executed against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// One substring query per column, each ordered by date; the result is
    /// the concatenation of the passes, newest first, NOT deduplicated.
    /// A row matching several columns appears once per matching pass.
    SubstringUnion,
    /// One substring query with the columns OR'd into a single predicate;
    /// newest first, deduplicated by message id.
    SubstringOr,
    /// One `tsquery` match against a text-search vector over the columns,
    /// with the keyword as a prefix match.
    FullText,
    /// One `tsquery` match per column, OR'd in a single query. Only defined
    /// over content and subject.
    FullTextOr,
}

/// Explicit configuration of the generalized search operation.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub field: SearchField,
    /// Substring strategies only; full-text matching folds case during
    /// tokenization regardless.
    pub case_sensitive: bool,
    pub strategy: SearchStrategy,
    pub limit: Option<i64>,
    /// Applied only together with `limit`, as in every legacy query path.
    pub offset: Option<i64>,
}

impl SearchConfig {
    pub fn new(field: SearchField, strategy: SearchStrategy) -> Self {
        Self {
            field,
            case_sensitive: false,
            strategy,
            limit: None,
            offset: None,
        }
    }

    // Presets reproducing the legacy entry points.

    pub fn subject() -> Self {
        Self::new(SearchField::Subject, SearchStrategy::SubstringUnion)
    }

    pub fn subject_cs() -> Self {
        Self {
            case_sensitive: true,
            ..Self::subject()
        }
    }

    pub fn content() -> Self {
        Self::new(SearchField::Content, SearchStrategy::SubstringUnion)
    }

    pub fn content_cs() -> Self {
        Self {
            case_sensitive: true,
            ..Self::content()
        }
    }

    /// Sender search as two passes, display name then address. A row whose
    /// name and address both match is returned twice.
    pub fn sender() -> Self {
        Self::new(SearchField::Sender, SearchStrategy::SubstringUnion)
    }

    pub fn sender_cs() -> Self {
        Self {
            case_sensitive: true,
            ..Self::sender()
        }
    }

    /// Sender search as a single OR predicate, deduplicated.
    pub fn sender_or() -> Self {
        Self::new(SearchField::Sender, SearchStrategy::SubstringOr)
    }

    pub fn sender_or_cs() -> Self {
        Self {
            case_sensitive: true,
            ..Self::sender_or()
        }
    }

    /// Content+subject as two passes. Does not support a limit; planning
    /// fails with [`StoreError::Unsupported`] when one is set.
    pub fn content_subject(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit,
            offset,
            ..Self::new(SearchField::ContentSubject, SearchStrategy::SubstringUnion)
        }
    }

    pub fn content_subject_cs() -> Self {
        Self {
            case_sensitive: true,
            ..Self::new(SearchField::ContentSubject, SearchStrategy::SubstringUnion)
        }
    }

    pub fn content_subject_or(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit,
            offset,
            ..Self::new(SearchField::ContentSubject, SearchStrategy::SubstringOr)
        }
    }

    pub fn content_subject_or_cs(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            case_sensitive: true,
            ..Self::content_subject_or(limit, offset)
        }
    }

    pub fn content_index(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit,
            offset,
            ..Self::new(SearchField::Content, SearchStrategy::FullText)
        }
    }

    /// Subject full-text search pages deep into the result set by default;
    /// pass an explicit offset to override.
    pub fn subject_index(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit,
            offset: offset.or(Some(SUBJECT_INDEX_DEFAULT_OFFSET)),
            ..Self::new(SearchField::Subject, SearchStrategy::FullText)
        }
    }

    pub fn content_subject_index(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit,
            offset,
            ..Self::new(SearchField::ContentSubject, SearchStrategy::FullText)
        }
    }

    pub fn content_subject_index_or(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit,
            offset,
            ..Self::new(SearchField::ContentSubject, SearchStrategy::FullTextOr)
        }
    }
}

/// A compiled search: SQL passes plus post-processing flags.
///
/// Each pass takes the same single bound argument. Passes run in order and
/// their rows are concatenated before `reverse`/`dedup` are applied.
#[derive(Debug)]
pub(crate) struct SearchPlan {
    pub passes: Vec<String>,
    pub argument: String,
    pub reverse: bool,
    pub dedup: bool,
}

/// Compile a configuration into SQL against one bound list table.
pub(crate) fn plan(
    table: &ListTable,
    config: &SearchConfig,
    keyword: &str,
) -> Result<SearchPlan, StoreError> {
    let select = table.select_emails();
    let columns = config.field.columns();
    let like = if config.case_sensitive { "LIKE" } else { "ILIKE" };

    match config.strategy {
        SearchStrategy::SubstringUnion => {
            if config.limit.is_some() {
                return Err(StoreError::Unsupported(
                    "limit is not supported for separate-pass substring search".to_string(),
                ));
            }
            let passes = columns
                .iter()
                .map(|column| format!("{select} WHERE {column} {like} $1 ORDER BY date"))
                .collect();
            Ok(SearchPlan {
                passes,
                argument: like_pattern(keyword),
                reverse: true,
                dedup: false,
            })
        }
        SearchStrategy::SubstringOr => {
            let predicate = columns
                .iter()
                .map(|column| format!("{column} {like} $1"))
                .collect::<Vec<_>>()
                .join(" OR ");
            let sql = format!(
                "{select} WHERE ({predicate}) ORDER BY date{}",
                pagination(config)
            );
            Ok(SearchPlan {
                passes: vec![sql],
                argument: like_pattern(keyword),
                reverse: true,
                dedup: true,
            })
        }
        SearchStrategy::FullText => {
            let vector = match config.field {
                SearchField::Subject => "subject",
                SearchField::Content => "content",
                SearchField::ContentSubject => "(content || ' ') || subject",
                SearchField::Sender => {
                    return Err(StoreError::Unsupported(
                        "sender fields are not full-text indexed".to_string(),
                    ));
                }
            };
            let mut sql = format!(
                "{select} WHERE to_tsvector('english', {vector}) @@ to_tsquery($1)"
            );
            // The combined-vector search returns rows in storage order.
            if config.field != SearchField::ContentSubject {
                sql.push_str(" ORDER BY date");
            }
            sql.push_str(&pagination(config));
            Ok(SearchPlan {
                passes: vec![sql],
                argument: tsquery_argument(keyword),
                reverse: false,
                dedup: false,
            })
        }
        SearchStrategy::FullTextOr => {
            if config.field != SearchField::ContentSubject {
                return Err(StoreError::Unsupported(
                    "per-column full-text match is only defined over content and subject"
                        .to_string(),
                ));
            }
            let sql = format!(
                "{select} WHERE to_tsvector('english', subject) @@ to_tsquery($1) \
                 OR to_tsvector('english', content) @@ to_tsquery($1){}",
                pagination(config)
            );
            Ok(SearchPlan {
                passes: vec![sql],
                argument: tsquery_argument(keyword),
                reverse: false,
                dedup: false,
            })
        }
    }
}

fn like_pattern(keyword: &str) -> String {
    format!("%{keyword}%")
}

/// Suffix the keyword with the prefix-match marker before handing it to
/// `to_tsquery`.
fn tsquery_argument(keyword: &str) -> String {
    format!("{keyword}:*")
}

fn pagination(config: &SearchConfig) -> String {
    match config.limit {
        Some(limit) => format!(" LIMIT {limit} OFFSET {}", config.offset.unwrap_or(0)),
        None => String::new(),
    }
}
