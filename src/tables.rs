//! Table-name resolution and per-table binding for list archives.

use dashmap::DashMap;
use std::sync::Arc;

/// Prefix shared by every list table. Part of the persisted schema; the
/// ingestion pipeline derives table names the same way.
pub const TABLE_PREFIX: &str = "HK_";

const EMAIL_COLUMNS: &str =
    r#"message_id, date, subject, sender, email, content, thread_id, "references""#;

/// Derive the backing table name for a fully qualified list address.
///
/// Replaces `-`, `.` and `@` with `_` and prepends [`TABLE_PREFIX`].
/// Deterministic and pure. Two distinct addresses can in theory map to the
/// same table name; no collision handling is attempted.
pub fn table_name(list_address: &str) -> String {
    let flattened: String = list_address
        .chars()
        .map(|c| match c {
            '-' | '.' | '@' => '_',
            other => other,
        })
        .collect();
    format!("{TABLE_PREFIX}{flattened}")
}

/// A bound accessor for one list table.
///
/// Binding happens at runtime because list tables are created dynamically by
/// the ingestion pipeline; nothing about the set of lists is known at compile
/// time. The accessor owns the quoted identifier used to splice the table
/// into SQL; all query values are bound separately.
#[derive(Debug)]
pub struct ListTable {
    name: String,
    ident: String,
}

impl ListTable {
    pub(crate) fn new(name: String) -> Self {
        let ident = format!("\"{name}\"");
        Self { name, ident }
    }

    /// The raw table name, e.g. `HK_devel_lists_example_org`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The double-quoted identifier for use in SQL text.
    pub(crate) fn ident(&self) -> &str {
        &self.ident
    }

    /// `SELECT <all email columns> FROM <table>` without any filter.
    pub(crate) fn select_emails(&self) -> String {
        format!("SELECT {EMAIL_COLUMNS} FROM {}", self.ident)
    }
}

/// Cache of table bindings, keyed by table name.
///
/// A binding is established once (after the table's existence has been
/// verified) and reused for every later call against the same list.
#[derive(Debug, Default)]
pub(crate) struct TableRegistry {
    bindings: DashMap<String, Arc<ListTable>>,
}

impl TableRegistry {
    pub(crate) fn get(&self, table: &str) -> Option<Arc<ListTable>> {
        self.bindings.get(table).map(|entry| Arc::clone(entry.value()))
    }

    pub(crate) fn bind(&self, table: String) -> Arc<ListTable> {
        let binding = Arc::new(ListTable::new(table.clone()));
        self.bindings.insert(table, Arc::clone(&binding));
        binding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_replaces_reserved_characters() {
        assert_eq!(
            table_name("devel-list@lists.example.org"),
            "HK_devel_list_lists_example_org"
        );
    }

    #[test]
    fn table_name_is_deterministic() {
        let first = table_name("users@lists.fedoraproject.org");
        let second = table_name("users@lists.fedoraproject.org");
        assert_eq!(first, second);
    }

    #[test]
    fn table_name_output_is_free_of_reserved_characters() {
        let name = table_name("a-b.c@d.e-f");
        assert!(!name.contains('-'));
        assert!(!name.contains('.'));
        assert!(!name.contains('@'));
        assert!(name.starts_with(TABLE_PREFIX));
    }

    #[test]
    fn registry_reuses_bindings() {
        let registry = TableRegistry::default();
        assert!(registry.get("HK_one").is_none());

        let bound = registry.bind("HK_one".to_string());
        let cached = registry.get("HK_one").expect("binding should be cached");
        assert!(Arc::ptr_eq(&bound, &cached));
    }

    #[test]
    fn select_clause_quotes_the_references_column() {
        let table = ListTable::new("HK_dev_example_org".to_string());
        let select = table.select_emails();
        assert!(select.contains(r#""references""#));
        assert!(select.ends_with(r#"FROM "HK_dev_example_org""#));
    }
}
