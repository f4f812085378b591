//! Parameterized WHERE-clause assembly for the listing endpoints.
//!
//! Callers compose queries only through the typed methods below; there is no
//! way to feed caller-controlled text into the SQL itself. Every value rides
//! in a numbered placeholder, and enum-valued filters are validated by serde
//! long before they reach this module (the explicit `::type` casts can then
//! never fail). LIMIT/OFFSET are rendered as integer literals from an
//! already-clamped [`Pagination`].

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::pagination::Pagination;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
    Int(i64),
    Bool(bool),
}

#[derive(Debug, Default)]
pub struct ListQuery {
    predicates: Vec<String>,
    params: Vec<SqlParam>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a param and return its 1-based placeholder index.
    fn placeholder(&mut self, param: SqlParam) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Mandatory tenant-scoping predicate; `None` (super_admin) adds nothing.
    pub fn tenant_scope(&mut self, column: &'static str, scope: Option<Uuid>) -> &mut Self {
        if let Some(tenant_id) = scope {
            self.eq_uuid(column, tenant_id);
        }
        self
    }

    pub fn eq_uuid(&mut self, column: &'static str, value: Uuid) -> &mut Self {
        let n = self.placeholder(SqlParam::Uuid(value));
        self.predicates.push(format!("{} = ${}", column, n));
        self
    }

    /// Equality against a Postgres enum column. `value` has already been
    /// validated against the Rust enum, so the cast cannot fail.
    pub fn eq_enum(&mut self, column: &'static str, pg_type: &'static str, value: &str) -> &mut Self {
        let n = self.placeholder(SqlParam::Text(value.to_string()));
        self.predicates.push(format!("{} = ${}::{}", column, n, pg_type));
        self
    }

    /// Case-insensitive substring search across one or more columns,
    /// sharing a single bound pattern.
    pub fn search(&mut self, columns: &[&'static str], term: &str) -> &mut Self {
        let pattern = format!("%{}%", term);
        let n = self.placeholder(SqlParam::Text(pattern));
        let parts: Vec<String> =
            columns.iter().map(|c| format!("{} ILIKE ${}", c, n)).collect();
        self.predicates.push(format!("({})", parts.join(" OR ")));
        self
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// `WHERE a AND b AND ...`, or empty when nothing was added
    /// (super_admin listing with no filters).
    pub fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.predicates.join(" AND "))
        }
    }

    pub fn count_sql(&self, from: &str) -> String {
        [format!("SELECT COUNT(*) FROM {}", from), self.where_clause()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn data_sql(&self, select_from: &str, order_by: &str, page: &Pagination) -> String {
        [
            select_from.to_string(),
            self.where_clause(),
            format!("ORDER BY {}", order_by),
            format!("LIMIT {} OFFSET {}", page.limit, page.offset()),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub async fn fetch_count(&self, pool: &PgPool, from: &str) -> Result<i64, sqlx::Error> {
        let sql = self.count_sql(from);
        let mut q = sqlx::query_scalar::<_, i64>(&sql);
        for p in &self.params {
            q = match p {
                SqlParam::Uuid(u) => q.bind(*u),
                SqlParam::Text(s) => q.bind(s.clone()),
                SqlParam::Int(i) => q.bind(*i),
                SqlParam::Bool(b) => q.bind(*b),
            };
        }
        q.fetch_one(pool).await
    }

    pub async fn fetch_page<T>(
        &self,
        pool: &PgPool,
        select_from: &str,
        order_by: &str,
        page: &Pagination,
    ) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = self.data_sql(select_from, order_by, page);
        let mut q = sqlx::query_as::<_, T>(&sql);
        for p in &self.params {
            q = match p {
                SqlParam::Uuid(u) => q.bind(*u),
                SqlParam::Text(s) => q.bind(s.clone()),
                SqlParam::Int(i) => q.bind(*i),
                SqlParam::Bool(b) => q.bind(*b),
            };
        }
        q.fetch_all(pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_has_no_where() {
        let q = ListQuery::new();
        assert_eq!(q.where_clause(), "");
        assert_eq!(q.count_sql("projects p"), "SELECT COUNT(*) FROM projects p");
    }

    #[test]
    fn predicates_number_sequentially() {
        let tenant = Uuid::new_v4();
        let mut q = ListQuery::new();
        q.tenant_scope("p.tenant_id", Some(tenant));
        q.search(&["p.name"], "alpha");
        q.eq_enum("p.status", "project_status", "active");

        assert_eq!(
            q.where_clause(),
            "WHERE p.tenant_id = $1 AND (p.name ILIKE $2) AND p.status = $3::project_status"
        );
        assert_eq!(q.params().len(), 3);
        assert_eq!(q.params()[1], SqlParam::Text("%alpha%".to_string()));
    }

    #[test]
    fn super_admin_scope_adds_nothing() {
        let mut q = ListQuery::new();
        q.tenant_scope("tenant_id", None);
        assert_eq!(q.where_clause(), "");
        assert!(q.params().is_empty());
    }

    #[test]
    fn multi_column_search_shares_one_param() {
        let mut q = ListQuery::new();
        q.search(&["full_name", "email"], "ann");
        assert_eq!(q.where_clause(), "WHERE (full_name ILIKE $1 OR email ILIKE $1)");
        assert_eq!(q.params().len(), 1);
    }

    #[test]
    fn data_sql_appends_order_and_page_window() {
        let mut q = ListQuery::new();
        q.eq_uuid("tenant_id", Uuid::new_v4());
        let page = Pagination::clamped(Some(3), Some(10), 10);
        let sql = q.data_sql("SELECT * FROM tasks", "created_at DESC", &page);
        assert_eq!(
            sql,
            "SELECT * FROM tasks WHERE tenant_id = $1 ORDER BY created_at DESC LIMIT 10 OFFSET 20"
        );
    }
}
