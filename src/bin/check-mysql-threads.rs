//! Check the number of threads actively running a statement
//!
//! `Threads_running` excludes idle connections, so it tracks how much work
//! the server is doing right now.

use serde::Deserialize;
use structopt::StructOpt;

use sensu_mysql::connection::ConnectionArgs;
use sensu_mysql::server::Server;
use sensu_mysql::thresholds::Thresholds;
use sensu_mysql::{CheckError, Report, Status};

/// Check the number of running MySQL threads
#[derive(Deserialize, Debug, StructOpt)]
#[structopt(
    name = "check-mysql-threads (part of sensu-mysql)",
    raw(setting = "structopt::clap::AppSettings::ColoredHelp")
)]
struct Args {
    #[structopt(flatten)]
    connection: ConnectionArgs,
    #[structopt(
        short = "w",
        long = "warnnum",
        help = "Number of running threads upon which we'll issue a warning",
        default_value = "20"
    )]
    warn: f64,
    #[structopt(
        short = "c",
        long = "critnum",
        help = "Number of running threads upon which we'll issue an alert",
        default_value = "25"
    )]
    crit: f64,
    #[structopt(short = "v", long = "verbose", help = "Log what is being queried")]
    verbose: bool,
}

fn do_check(args: &Args, running: u64) -> Report {
    match Thresholds::new(args.warn, args.crit).evaluate(running as f64) {
        Status::Ok => Report::ok(format!(
            "Currently running threads are under limit in MySQL: {}",
            running
        )),
        status => Report::new(
            status,
            format!("MySQL currently running threads: {}", running),
        ),
    }
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    sensu_mysql::logging::init(args.verbose);
    sensu_mysql::run(|| -> Result<Report, CheckError> {
        let params = args.connection.resolve()?;
        let mut server = Server::connect(&params)?;
        let running = server.global_status_u64("Threads_running")?;
        Ok(do_check(&args, running))
    })
    .print_and_exit("check-mysql-threads");
}
