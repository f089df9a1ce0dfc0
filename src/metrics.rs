//! Graphite samples from server status counters
//!
//! Only the names in [`CATEGORIES`] are emitted, each under its category and
//! a shorter camel-cased name. Everything else the server reports is
//! ignored.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::error::Unexpected;
use crate::replication::ReplicaStatus;
use crate::CheckError;

/// A group of server variables sharing a path component
#[derive(Debug)]
pub struct Category {
    pub name: &'static str,
    /// `(server name, metric name)`
    pub metrics: &'static [(&'static str, &'static str)],
}

pub const GENERAL: Category = Category {
    name: "general",
    metrics: &[
        ("Bytes_received", "rxBytes"),
        ("Bytes_sent", "txBytes"),
        ("Key_read_requests", "keyRead_requests"),
        ("Key_reads", "keyReads"),
        ("Key_write_requests", "keyWrite_requests"),
        ("Key_writes", "keyWrites"),
        ("Binlog_cache_use", "binlogCacheUse"),
        ("Binlog_cache_disk_use", "binlogCacheDiskUse"),
        ("Max_used_connections", "maxUsedConnections"),
        ("Aborted_clients", "abortedClients"),
        ("Aborted_connects", "abortedConnects"),
        ("Threads_connected", "threadsConnected"),
        ("Open_files", "openFiles"),
        ("Open_tables", "openTables"),
        ("Opened_tables", "openedTables"),
        ("Prepared_stmt_count", "preparedStmtCount"),
        ("Seconds_Behind_Master", "slaveLag"),
        ("Select_full_join", "fullJoins"),
        ("Select_full_range_join", "fullRangeJoins"),
        ("Select_range", "selectRange"),
        ("Select_range_check", "selectRange_check"),
        ("Select_scan", "selectScan"),
        ("Slow_queries", "slowQueries"),
    ],
};

pub const QUERYCACHE: Category = Category {
    name: "querycache",
    metrics: &[
        ("Qcache_queries_in_cache", "queriesInCache"),
        ("Qcache_hits", "cacheHits"),
        ("Qcache_inserts", "inserts"),
        ("Qcache_not_cached", "notCached"),
        ("Qcache_lowmem_prunes", "lowMemPrunes"),
    ],
};

pub const COMMANDS: Category = Category {
    name: "commands",
    metrics: &[
        ("Com_admin_commands", "admin_commands"),
        ("Com_begin", "begin"),
        ("Com_change_db", "change_db"),
        ("Com_commit", "commit"),
        ("Com_create_table", "create_table"),
        ("Com_drop_table", "drop_table"),
        ("Com_show_keys", "show_keys"),
        ("Com_delete", "delete"),
        ("Com_create_db", "create_db"),
        ("Com_grant", "grant"),
        ("Com_show_processlist", "show_processlist"),
        ("Com_flush", "flush"),
        ("Com_insert", "insert"),
        ("Com_purge", "purge"),
        ("Com_replace", "replace"),
        ("Com_rollback", "rollback"),
        ("Com_select", "select"),
        ("Com_set_option", "set_option"),
        ("Com_show_binlogs", "show_binlogs"),
        ("Com_show_databases", "show_databases"),
        ("Com_show_fields", "show_fields"),
        ("Com_show_status", "show_status"),
        ("Com_show_tables", "show_tables"),
        ("Com_show_variables", "show_variables"),
        ("Com_update", "update"),
        ("Com_drop_db", "drop_db"),
        ("Com_revoke", "revoke"),
        ("Com_drop_user", "drop_user"),
        ("Com_show_grants", "show_grants"),
        ("Com_lock_tables", "lock_tables"),
        ("Com_show_create_table", "show_create_table"),
        ("Com_unlock_tables", "unlock_tables"),
        ("Com_alter_table", "alter_table"),
    ],
};

pub const COUNTERS: Category = Category {
    name: "counters",
    metrics: &[
        ("Handler_write", "handlerWrite"),
        ("Handler_update", "handlerUpdate"),
        ("Handler_delete", "handlerDelete"),
        ("Handler_read_first", "handlerRead_first"),
        ("Handler_read_key", "handlerRead_key"),
        ("Handler_read_next", "handlerRead_next"),
        ("Handler_read_prev", "handlerRead_prev"),
        ("Handler_read_rnd", "handlerRead_rnd"),
        ("Handler_read_rnd_next", "handlerRead_rnd_next"),
        ("Handler_commit", "handlerCommit"),
        ("Handler_rollback", "handlerRollback"),
        ("Handler_savepoint", "handlerSavepoint"),
        ("Handler_savepoint_rollback", "handlerSavepointRollback"),
    ],
};

pub const INNODB: Category = Category {
    name: "innodb",
    metrics: &[
        ("Innodb_buffer_pool_pages_total", "bufferTotal_pages"),
        ("Innodb_buffer_pool_pages_free", "bufferFree_pages"),
        ("Innodb_buffer_pool_pages_dirty", "bufferDirty_pages"),
        ("Innodb_buffer_pool_pages_data", "bufferUsed_pages"),
        ("Innodb_page_size", "pageSize"),
        ("Innodb_pages_created", "pagesCreated"),
        ("Innodb_pages_read", "pagesRead"),
        ("Innodb_pages_written", "pagesWritten"),
        ("Innodb_row_lock_current_waits", "currentLockWaits"),
        ("Innodb_row_lock_waits", "lockWaitTimes"),
        ("Innodb_row_lock_time", "rowLockTime"),
        ("Innodb_data_reads", "fileReads"),
        ("Innodb_data_writes", "fileWrites"),
        ("Innodb_data_fsyncs", "fileFsyncs"),
        ("Innodb_log_writes", "logWrites"),
        ("Innodb_rows_updated", "rowsUpdated"),
        ("Innodb_rows_read", "rowsRead"),
        ("Innodb_rows_deleted", "rowsDeleted"),
        ("Innodb_rows_inserted", "rowsInserted"),
    ],
};

/// Matched against `SHOW GLOBAL VARIABLES`, ignoring case
pub const CONFIGURATION: Category = Category {
    name: "configuration",
    metrics: &[
        ("max_connections", "MaxConnections"),
        ("Max_prepared_stmt_count", "MaxPreparedStmtCount"),
    ],
};

pub const CATEGORIES: &[&Category] = &[
    &GENERAL,
    &QUERYCACHE,
    &COMMANDS,
    &COUNTERS,
    &INNODB,
    &CONFIGURATION,
];

lazy_static! {
    /// Status name to every `(category, metric)` it is emitted as
    static ref STATUS_INDEX: HashMap<&'static str, Vec<(&'static str, &'static str)>> = {
        let mut index: HashMap<_, Vec<_>> = HashMap::new();
        for category in CATEGORIES {
            for &(name, metric) in category.metrics {
                index.entry(name).or_default().push((category.name, metric));
            }
        }
        index
    };
    static ref GENERAL_INDEX: HashMap<&'static str, &'static str> =
        GENERAL.metrics.iter().cloned().collect();
    /// Lowercased variable name to metric name
    static ref CONFIGURATION_INDEX: HashMap<String, &'static str> = CONFIGURATION
        .metrics
        .iter()
        .map(|&(name, metric)| (name.to_lowercase(), metric))
        .collect();
}

/// One graphite plaintext line
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub path: String,
    pub value: String,
    pub timestamp: i64,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.path, self.value, self.timestamp)
    }
}

/// Builds samples under `<scheme>.<scheme_append>` at a fixed time
#[derive(Debug, Clone)]
pub struct Emitter {
    prefix: String,
    timestamp: i64,
}

impl Emitter {
    pub fn new(scheme: &str, scheme_append: &str, timestamp: i64) -> Emitter {
        Emitter {
            prefix: format!("{}.{}", scheme, scheme_append),
            timestamp,
        }
    }

    fn sample(&self, category: &str, metric: &str, value: &str) -> Sample {
        Sample {
            path: format!("{}.{}.{}", self.prefix, category, metric),
            value: value.to_owned(),
            timestamp: self.timestamp,
        }
    }

    /// Rows of `SHOW GLOBAL STATUS`, names matched exactly
    pub fn status_samples(&self, rows: &[(String, Option<String>)]) -> Vec<Sample> {
        let mut samples = Vec::new();
        for (name, value) in rows {
            let value = match *value {
                Some(ref value) => value,
                None => continue,
            };
            if let Some(targets) = STATUS_INDEX.get(name.as_str()) {
                for &(category, metric) in targets {
                    samples.push(self.sample(category, metric, value));
                }
            }
        }
        samples
    }

    /// The `general` columns of a replica status row
    ///
    /// A NULL lag means replication is broken, and is emitted as `-1`.
    pub fn replica_samples(&self, status: &ReplicaStatus) -> Vec<Sample> {
        status
            .fields()
            .filter_map(|(name, value)| {
                let metric = GENERAL_INDEX.get(name)?;
                let value = match value {
                    Some(value) => value,
                    None if name == "Seconds_Behind_Master" => "-1",
                    None => return None,
                };
                Some(self.sample(GENERAL.name, metric, value))
            })
            .collect()
    }

    /// Rows of `SHOW GLOBAL VARIABLES`, names matched ignoring case
    pub fn configuration_samples(&self, rows: &[(String, Option<String>)]) -> Vec<Sample> {
        rows.iter()
            .filter_map(|(name, value)| {
                let metric = CONFIGURATION_INDEX.get(&name.to_lowercase())?;
                let value = value.as_ref()?;
                Some(self.sample(CONFIGURATION.name, metric, value))
            })
            .collect()
    }
}

/// `<hostname>.mysql`
pub fn default_scheme() -> Result<String, CheckError> {
    let hostname = nix::unistd::gethostname()
        .map_err(|e| Unexpected::new(format!("unable to read hostname: {}", e)))?;
    Ok(format!("{}.mysql", hostname.to_string_lossy()))
}

#[cfg(test)]
mod test {
    use super::{Emitter, Sample, CATEGORIES};
    use crate::replication::ReplicaStatus;

    fn rows(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.map(str::to_owned)))
            .collect()
    }

    fn emitter() -> Emitter {
        Emitter::new("db01.mysql", "db01", 1_500_000_000)
    }

    #[test]
    fn sample_line() {
        let sample = Sample {
            path: "db01.mysql.db01.general.rxBytes".to_owned(),
            value: "12345".to_owned(),
            timestamp: 1_500_000_000,
        };
        assert_eq!(
            sample.to_string(),
            "db01.mysql.db01.general.rxBytes 12345 1500000000"
        );
    }

    #[test]
    fn mapped_status_emits_one_sample() {
        let samples = emitter().status_samples(&rows(&[("Bytes_received", Some("12345"))]));
        assert_eq!(
            samples,
            vec![Sample {
                path: "db01.mysql.db01.general.rxBytes".to_owned(),
                value: "12345".to_owned(),
                timestamp: 1_500_000_000,
            }]
        );
    }

    #[test]
    fn unmapped_and_null_status_is_skipped() {
        let samples = emitter().status_samples(&rows(&[
            ("Uptime", Some("86400")),
            ("Bytes_sent", None),
            ("Com_select", Some("42")),
        ]));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].path, "db01.mysql.db01.commands.select");
        assert_eq!(samples[0].value, "42");
    }

    #[test]
    fn status_names_are_case_sensitive() {
        let samples = emitter().status_samples(&rows(&[("bytes_received", Some("1"))]));
        assert!(samples.is_empty());
    }

    #[test]
    fn configuration_names_are_not() {
        let samples = emitter().configuration_samples(&rows(&[
            ("MAX_CONNECTIONS", Some("151")),
            ("max_prepared_stmt_count", Some("16382")),
            ("innodb_buffer_pool_size", Some("134217728")),
        ]));
        let lines: Vec<String> = samples.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "db01.mysql.db01.configuration.MaxConnections 151 1500000000",
                "db01.mysql.db01.configuration.MaxPreparedStmtCount 16382 1500000000",
            ]
        );
    }

    #[test]
    fn null_lag_is_negative_one() {
        let status = ReplicaStatus::from_fields(vec![
            ("Slave_IO_Running", Some("No".to_owned())),
            ("Seconds_Behind_Master", None),
            ("Relay_Log_Space", Some("1024".to_owned())),
        ]);
        let samples = emitter().replica_samples(&status);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].path, "db01.mysql.db01.general.slaveLag");
        assert_eq!(samples[0].value, "-1");

        let status = ReplicaStatus::from_fields(vec![("Seconds_Behind_Master", Some("12".to_owned()))]);
        assert_eq!(emitter().replica_samples(&status)[0].value, "12");
    }

    #[test]
    fn tables_have_no_duplicate_names() {
        for category in CATEGORIES {
            let mut names: Vec<_> = category.metrics.iter().map(|m| m.0).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), category.metrics.len(), "{}", category.name);
        }
    }
}
