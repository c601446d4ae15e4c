//! Metric collection queries.
//!
//! Every user-supplied value reaches the database as a bind parameter, never
//! spliced into the SQL text.

use oracle::Connection;

use check_oracle::TablespaceUsage;

/// Per-tablespace capacity from the data file catalog, with the percentage
/// computed in SQL as a float. Tablespaces without free extents report zero
/// free space through the outer join.
pub const TABLESPACE_USAGE_SQL: &str = "\
SELECT b.tablespace_name AS tablespace_name, \
       b.tbs_size AS total_mb, \
       NVL(a.free_space, 0) AS free_mb, \
       ((b.tbs_size - NVL(a.free_space, 0)) / b.tbs_size) * 100 AS pct_used \
  FROM (SELECT tablespace_name, ROUND(SUM(bytes) / 1024 / 1024, 2) AS free_space \
          FROM dba_free_space GROUP BY tablespace_name) a, \
       (SELECT tablespace_name, SUM(bytes) / 1024 / 1024 AS tbs_size \
          FROM dba_data_files GROUP BY tablespace_name) b \
 WHERE a.tablespace_name(+) = b.tablespace_name";

pub const DATABASE_SESSIONS_SQL: &str = "SELECT COUNT(1) FROM v$session";

pub const USER_SESSIONS_SQL: &str =
    "SELECT COUNT(1) FROM v$session WHERE username = :username";

fn single_tablespace_sql() -> String {
    format!("{} AND b.tablespace_name = :name", TABLESPACE_USAGE_SQL)
}

pub fn connect(
    host: &str,
    port: u16,
    instance: &str,
    user: &str,
    password: &str,
) -> oracle::Result<Connection> {
    let connect_string = format!("//{}:{}/{}", host, port, instance);
    tracing::debug!(%connect_string, user, "connecting");
    Connection::connect(user, password, connect_string)
}

pub fn all_tablespaces(conn: &Connection) -> oracle::Result<Vec<TablespaceUsage>> {
    tracing::debug!(query = TABLESPACE_USAGE_SQL, "collecting tablespace usage");

    let mut readings = Vec::new();
    for row in conn.query(TABLESPACE_USAGE_SQL, &[])? {
        let reading = reading_from_row(&row?)?;
        tracing::debug!(
            name = %reading.name,
            used_mb = reading.used_mb,
            total_mb = reading.total_mb,
            used_pct = reading.used_pct,
            "tablespace"
        );
        readings.push(reading);
    }
    Ok(readings)
}

/// Returns the usage of one named tablespace, or `None` if the catalog has no
/// such tablespace.
pub fn tablespace(conn: &Connection, name: &str) -> oracle::Result<Option<TablespaceUsage>> {
    let query = single_tablespace_sql();
    tracing::debug!(%query, name, "collecting tablespace usage");

    let mut rows = conn.query_named(&query, &[("name", &name)])?;
    match rows.next() {
        Some(row) => Ok(Some(reading_from_row(&row?)?)),
        None => Ok(None),
    }
}

pub fn session_count(conn: &Connection) -> oracle::Result<i64> {
    tracing::debug!(query = DATABASE_SESSIONS_SQL, "counting sessions");
    conn.query_row_as::<i64>(DATABASE_SESSIONS_SQL, &[])
}

pub fn user_session_count(conn: &Connection, username: &str) -> oracle::Result<i64> {
    tracing::debug!(query = USER_SESSIONS_SQL, username, "counting sessions");
    conn.query_row_as_named::<i64>(USER_SESSIONS_SQL, &[("username", &username)])
}

fn reading_from_row(row: &oracle::Row) -> oracle::Result<TablespaceUsage> {
    let name: String = row.get("TABLESPACE_NAME")?;
    let total_mb: f64 = row.get("TOTAL_MB")?;
    let free_mb: f64 = row.get("FREE_MB")?;
    let used_pct: f64 = row.get("PCT_USED")?;

    Ok(TablespaceUsage {
        name,
        used_mb: total_mb - free_mb,
        used_pct,
        total_mb,
    })
}
