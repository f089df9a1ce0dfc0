//! The one connection a script holds, and the statements it can run
//!
//! Dropping a `Server` closes the connection.

use mysql::prelude::Queryable;
use mysql::{Conn, Opts, Row, Value};

use crate::connection::ConnectionParams;
use crate::disk::SchemaSize;
use crate::replication::ReplicaStatus;
use crate::CheckError;

/// Total size per schema in GB, rounded to two places
const SCHEMA_SIZES: &str = "SELECT table_schema, \
     COUNT(*) AS table_count, \
     ROUND(SUM(data_length + index_length) / (1024 * 1024 * 1024), 2) AS total_size \
     FROM information_schema.TABLES GROUP BY table_schema";

pub struct Server {
    conn: Conn,
}

impl Server {
    pub fn connect(params: &ConnectionParams) -> Result<Server, CheckError> {
        tracing::debug!(server = %params, user = ?params.user, "connecting");
        let conn = Conn::new(Opts::from(params))?;
        Ok(Server { conn })
    }

    /// `SHOW VARIABLES LIKE '<name>'`
    pub fn variable(&mut self, name: &'static str) -> Result<String, CheckError> {
        self.single_value(&format!("SHOW VARIABLES LIKE '{}'", name), name)
    }

    /// `SHOW GLOBAL STATUS LIKE '<name>'`
    pub fn global_status(&mut self, name: &'static str) -> Result<String, CheckError> {
        self.single_value(&format!("SHOW GLOBAL STATUS LIKE '{}'", name), name)
    }

    /// A status counter or variable that is known to be an integer
    pub fn global_status_u64(&mut self, name: &'static str) -> Result<u64, CheckError> {
        let value = self.global_status(name)?;
        parse_u64(name, &value)
    }

    pub fn variable_u64(&mut self, name: &'static str) -> Result<u64, CheckError> {
        let value = self.variable(name)?;
        parse_u64(name, &value)
    }

    fn single_value(&mut self, query: &str, name: &str) -> Result<String, CheckError> {
        tracing::debug!(query, "running");
        let row: Option<(String, Option<String>)> = self.conn.query_first(query)?;
        match row {
            Some((_, Some(value))) => Ok(value),
            _ => Err(CheckError::missing(name)),
        }
    }

    /// Every `(Variable_name, Value)` pair from `SHOW GLOBAL STATUS`
    pub fn global_status_all(&mut self) -> Result<Vec<(String, Option<String>)>, CheckError> {
        tracing::debug!("running SHOW GLOBAL STATUS");
        Ok(self.conn.query("SHOW GLOBAL STATUS")?)
    }

    /// Every `(Variable_name, Value)` pair from `SHOW GLOBAL VARIABLES`
    pub fn global_variables_all(&mut self) -> Result<Vec<(String, Option<String>)>, CheckError> {
        tracing::debug!("running SHOW GLOBAL VARIABLES");
        Ok(self.conn.query("SHOW GLOBAL VARIABLES")?)
    }

    /// One entry per replication channel, empty if this is not a replica
    pub fn replica_status(&mut self) -> Result<Vec<ReplicaStatus>, CheckError> {
        tracing::debug!("running SHOW SLAVE STATUS");
        let rows: Vec<Row> = self.conn.query("SHOW SLAVE STATUS")?;
        Ok(rows.iter().map(replica_status_from_row).collect())
    }

    pub fn schema_sizes(&mut self) -> Result<Vec<SchemaSize>, CheckError> {
        tracing::debug!(query = SCHEMA_SIZES, "running");
        let rows: Vec<(String, u64, Option<String>)> = self.conn.query(SCHEMA_SIZES)?;
        rows.into_iter()
            .map(|(schema, tables, total)| {
                let total_gb = match total {
                    Some(ref total) => total
                        .parse::<f64>()
                        .map_err(|e| CheckError::invalid("total_size", total, e))?,
                    // only views, or no tables at all
                    None => 0.0,
                };
                Ok(SchemaSize {
                    schema,
                    tables,
                    total_gb,
                })
            })
            .collect()
    }
}

fn parse_u64(name: &str, value: &str) -> Result<u64, CheckError> {
    value
        .trim()
        .parse()
        .map_err(|e| CheckError::invalid(name, value, e))
}

fn replica_status_from_row(row: &Row) -> ReplicaStatus {
    let fields = row
        .columns_ref()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value = row.as_ref(i).and_then(value_to_string);
            (column.name_str().into_owned(), value)
        });
    ReplicaStatus::from_fields(fields)
}

/// Text protocol results are nearly always bytes, but be ready for the rest
fn value_to_string(value: &Value) -> Option<String> {
    match *value {
        Value::NULL => None,
        Value::Bytes(ref bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::Int(i) => Some(i.to_string()),
        Value::UInt(u) => Some(u.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Double(d) => Some(d.to_string()),
        ref other => Some(other.as_sql(true).trim_matches('\'').to_owned()),
    }
}

#[cfg(test)]
mod test {
    use mysql::Value;

    use super::{parse_u64, value_to_string};
    use crate::Status;

    #[test]
    fn values_become_text() {
        assert_eq!(value_to_string(&Value::NULL), None);
        assert_eq!(
            value_to_string(&Value::Bytes(b"Yes".to_vec())),
            Some("Yes".to_owned())
        );
        assert_eq!(value_to_string(&Value::Int(-3)), Some("-3".to_owned()));
        assert_eq!(value_to_string(&Value::UInt(1800)), Some("1800".to_owned()));
    }

    #[test]
    fn counters_parse() {
        assert_eq!(parse_u64("Threads_running", "12").unwrap(), 12);
        assert_eq!(parse_u64("Threads_running", " 7\n").unwrap(), 7);
        let err = parse_u64("max_connections", "lots").unwrap_err();
        assert_eq!(err.report().status, Status::Unknown);
        assert!(err.to_string().starts_with("invalid max_connections \"lots\""));
    }
}
