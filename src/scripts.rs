//! Documentation about the various scripts contained herein
//!
//! Every script takes the same connection flags. When `--ini` is given, each value in its `[client]`
//! section overrides the matching flag.
//!
//! - [check-mysql-connections](#check-mysql-connections)
//! - [check-mysql-threads](#check-mysql-threads)
//! - [check-mysql-replication-status](#check-mysql-replication-status)
//! - [check-mysql-disk](#check-mysql-disk)
//! - [metrics-mysql-graphite](#metrics-mysql-graphite)
//!
//! # check-mysql-connections
//!
//! Needs `SHOW VARIABLES` and `SHOW GLOBAL STATUS`.
//!
//! ```plain
//! $ check-mysql-connections --help
//! check-mysql-connections (part of sensu-mysql) 0.1.0
//! Check the number of open MySQL connections
//!
//! USAGE:
//!     check-mysql-connections [FLAGS] [OPTIONS]
//!
//! FLAGS:
//!     -h, --help          Prints help information
//!     -a, --percentage    Use percentage of defined max connections instead of absolute number
//!     -V, --version       Prints version information
//!     -v, --verbose       Log what is being queried
//!
//! OPTIONS:
//!     -c, --critnum <crit>         Number of connections upon which we'll issue an alert [default: 128]
//!     -d, --database <database>    Database schema to connect to
//!     -H, --hostname <hostname>    Hostname to login to
//!     -i, --ini <ini>              My.cnf ini file, its [client] section overrides the flags
//!     -p, --password <password>    MySQL Password
//!     -P, --port <port>            Port to connect to [default: 3306]
//!     -s, --socket <socket>        Socket to use
//!     -u, --user <user>            MySQL User
//!     -w, --warnnum <warn>         Number of connections upon which we'll issue a warning [default: 100]
//! ```
//!
//! # check-mysql-threads
//!
//! Needs `SHOW GLOBAL STATUS`.
//!
//! ```plain
//! $ check-mysql-threads --help
//! check-mysql-threads (part of sensu-mysql) 0.1.0
//! Check the number of running MySQL threads
//!
//! USAGE:
//!     check-mysql-threads [FLAGS] [OPTIONS]
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!     -v, --verbose    Log what is being queried
//!
//! OPTIONS:
//!     -c, --critnum <crit>         Number of running threads upon which we'll issue an alert [default: 25]
//!     -d, --database <database>    Database schema to connect to
//!     -H, --hostname <hostname>    Hostname to login to
//!     -i, --ini <ini>              My.cnf ini file, its [client] section overrides the flags
//!     -p, --password <password>    MySQL Password
//!     -P, --port <port>            Port to connect to [default: 3306]
//!     -s, --socket <socket>        Socket to use
//!     -u, --user <user>            MySQL User
//!     -w, --warnnum <warn>         Number of running threads upon which we'll issue a warning [default: 20]
//! ```
//!
//! # check-mysql-replication-status
//!
//! Needs the `REPLICATION CLIENT` privilege. Passes on servers that are not replicas.
//!
//! ```plain
//! $ check-mysql-replication-status --help
//! check-mysql-replication-status (part of sensu-mysql) 0.1.0
//! Check MySQL replica threads and replication lag
//!
//! USAGE:
//!     check-mysql-replication-status [FLAGS] [OPTIONS]
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!     -v, --verbose    Log what is being queried
//!
//! OPTIONS:
//!     -c, --critical <crit>        Critical threshold for replication lag, in seconds [default: 1800]
//!     -d, --database <database>    Database schema to connect to
//!     -H, --hostname <hostname>    Hostname to login to
//!     -i, --ini <ini>              My.cnf ini file, its [client] section overrides the flags
//!     -p, --password <password>    MySQL Password
//!     -P, --port <port>            Port to connect to [default: 3306]
//!     -s, --socket <socket>        Socket to use
//!     -u, --user <user>            MySQL User
//!     -w, --warning <warn>         Warning threshold for replication lag, in seconds [default: 900]
//! ```
//!
//! # check-mysql-disk
//!
//! Reads `information_schema.TABLES`, so the user only sees schemas it has access to.
//!
//! ```plain
//! $ check-mysql-disk --help
//! check-mysql-disk (part of sensu-mysql) 0.1.0
//! Check MySQL database size as a percentage of disk capacity
//!
//! USAGE:
//!     check-mysql-disk [FLAGS] [OPTIONS] --size <size>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!     -v, --verbose    Log what is being queried
//!
//! OPTIONS:
//!     -c, --critical <crit>        Percent of disk used upon which we'll issue an alert [default: 95]
//!     -d, --database <database>    Database schema to connect to
//!     -H, --hostname <hostname>    Hostname to login to
//!     -i, --ini <ini>              My.cnf ini file, its [client] section overrides the flags
//!     -p, --password <password>    MySQL Password
//!     -P, --port <port>            Port to connect to [default: 3306]
//!         --size <size>            Capacity of the database disk, in GB
//!     -s, --socket <socket>        Socket to use
//!     -u, --user <user>            MySQL User
//!     -w, --warning <warn>         Percent of disk used upon which we'll issue a warning [default: 85]
//! ```
//!
//! # metrics-mysql-graphite
//!
//! Prints graphite plaintext samples, one per line. Replica metrics need `REPLICATION CLIENT`, or pass `--no-slave`.
//!
//! ```plain
//! $ metrics-mysql-graphite --help
//! metrics-mysql-graphite (part of sensu-mysql) 0.1.0
//! Emit MySQL status counters and configuration as graphite samples
//!
//! USAGE:
//!     metrics-mysql-graphite [FLAGS] [OPTIONS]
//!
//! FLAGS:
//!     -h, --help        Prints help information
//!     -n, --no-slave    Skip replica metrics, for servers without REPLICATION CLIENT
//!     -V, --version     Prints version information
//!     -v, --verbose     Log what is being queried
//!
//! OPTIONS:
//!     -d, --database <database>              Database schema to connect to
//!     -H, --hostname <hostname>              Hostname to login to
//!     -i, --ini <ini>                        My.cnf ini file, its [client] section overrides the flags
//!     -p, --password <password>              MySQL Password
//!     -P, --port <port>                      Port to connect to [default: 3306]
//!     -S, --scheme <scheme>                  Metric naming scheme, text to prepend to metric [default:
//!                                            <hostname>.mysql]
//!     -A, --scheme-append <scheme_append>    Text appended to the scheme [default: the MySQL host]
//!     -s, --socket <socket>                  Socket to use
//!     -u, --user <user>                      MySQL User
//! ```
