//! Check the size of all databases against the capacity of their disk
//!
//! The size is data plus indexes as reported by `information_schema`, so
//! binlogs, temporary files and free space inside tablespaces are not
//! counted.

use serde::Deserialize;
use structopt::StructOpt;

use sensu_mysql::connection::ConnectionArgs;
use sensu_mysql::disk::{self, SchemaSize};
use sensu_mysql::error::Unexpected;
use sensu_mysql::server::Server;
use sensu_mysql::thresholds::Thresholds;
use sensu_mysql::{CheckError, Report};

/// Check MySQL database size as a percentage of disk capacity
#[derive(Deserialize, Debug, StructOpt)]
#[structopt(
    name = "check-mysql-disk (part of sensu-mysql)",
    raw(setting = "structopt::clap::AppSettings::ColoredHelp")
)]
struct Args {
    #[structopt(flatten)]
    connection: ConnectionArgs,
    #[structopt(long = "size", help = "Capacity of the database disk, in GB")]
    size: f64,
    #[structopt(
        short = "w",
        long = "warning",
        help = "Percent of disk used upon which we'll issue a warning",
        default_value = "85"
    )]
    warn: f64,
    #[structopt(
        short = "c",
        long = "critical",
        help = "Percent of disk used upon which we'll issue an alert",
        default_value = "95"
    )]
    crit: f64,
    #[structopt(short = "v", long = "verbose", help = "Log what is being queried")]
    verbose: bool,
}

fn validate(args: &Args) -> Result<(), CheckError> {
    if args.size > 0.0 {
        Ok(())
    } else {
        Err(Unexpected::new(format!("--size must be greater than 0, got {}", args.size)).into())
    }
}

fn do_check(args: &Args, schemas: &[SchemaSize]) -> Report {
    disk::evaluate(schemas, args.size, &Thresholds::new(args.warn, args.crit))
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    sensu_mysql::logging::init(args.verbose);
    sensu_mysql::run(|| -> Result<Report, CheckError> {
        validate(&args)?;
        let params = args.connection.resolve()?;
        let mut server = Server::connect(&params)?;
        let schemas = server.schema_sizes()?;
        Ok(do_check(&args, &schemas))
    })
    .print_and_exit("check-mysql-disk");
}
