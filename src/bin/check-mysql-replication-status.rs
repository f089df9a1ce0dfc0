//! Check that a replica is replicating, and not too far behind
//!
//! A server that is not a replica passes.

use serde::Deserialize;
use structopt::StructOpt;

use sensu_mysql::connection::ConnectionArgs;
use sensu_mysql::replication::{self, ReplicaStatus};
use sensu_mysql::server::Server;
use sensu_mysql::thresholds::Thresholds;
use sensu_mysql::{CheckError, Report};

/// Check MySQL replica threads and replication lag
#[derive(Deserialize, Debug, StructOpt)]
#[structopt(
    name = "check-mysql-replication-status (part of sensu-mysql)",
    raw(setting = "structopt::clap::AppSettings::ColoredHelp")
)]
struct Args {
    #[structopt(flatten)]
    connection: ConnectionArgs,
    #[structopt(
        short = "w",
        long = "warning",
        help = "Warning threshold for replication lag, in seconds",
        default_value = "900"
    )]
    warn: u64,
    #[structopt(
        short = "c",
        long = "critical",
        help = "Critical threshold for replication lag, in seconds",
        default_value = "1800"
    )]
    crit: u64,
    #[structopt(short = "v", long = "verbose", help = "Log what is being queried")]
    verbose: bool,
}

fn do_check(args: &Args, channels: &[ReplicaStatus]) -> Report {
    let thresholds = Thresholds::new(args.warn as f64, args.crit as f64);
    replication::evaluate(channels, &thresholds)
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    sensu_mysql::logging::init(args.verbose);
    sensu_mysql::run(|| -> Result<Report, CheckError> {
        let params = args.connection.resolve()?;
        let mut server = Server::connect(&params)?;
        let channels = server.replica_status()?;
        Ok(do_check(&args, &channels))
    })
    .print_and_exit("check-mysql-replication-status");
}
