//! Check how many client connections are open against `max_connections`
//!
//! Thresholds are a count of connections by default, or a percentage of
//! `max_connections` with `--percentage`.

use serde::Deserialize;
use structopt::StructOpt;

use sensu_mysql::connection::ConnectionArgs;
use sensu_mysql::server::Server;
use sensu_mysql::thresholds::{Mode, Thresholds};
use sensu_mysql::{CheckError, Report, Status};

/// Check the number of open MySQL connections
#[derive(Deserialize, Debug, StructOpt)]
#[structopt(
    name = "check-mysql-connections (part of sensu-mysql)",
    raw(setting = "structopt::clap::AppSettings::ColoredHelp")
)]
struct Args {
    #[structopt(flatten)]
    connection: ConnectionArgs,
    #[structopt(
        short = "w",
        long = "warnnum",
        help = "Number of connections upon which we'll issue a warning",
        default_value = "100"
    )]
    warn: f64,
    #[structopt(
        short = "c",
        long = "critnum",
        help = "Number of connections upon which we'll issue an alert",
        default_value = "128"
    )]
    crit: f64,
    #[structopt(
        short = "a",
        long = "percentage",
        help = "Use percentage of defined max connections instead of absolute number"
    )]
    percentage: bool,
    #[structopt(short = "v", long = "verbose", help = "Log what is being queried")]
    verbose: bool,
}

fn do_check(args: &Args, used: u64, max: u64) -> Report {
    let thresholds = Thresholds::new(args.warn, args.crit);
    let mode = if args.percentage {
        Mode::Percentage { max: max as f64 }
    } else {
        Mode::Absolute
    };
    let status = thresholds.evaluate_in(used as f64, mode);
    let mut message = match status {
        Status::Ok => format!(
            "Max connections is under limit in MySQL: {} out of {}",
            used, max
        ),
        _ => format!("Max connections reached in MySQL: {} out of {}", used, max),
    };
    if args.percentage {
        message.push_str(&format!(" ({:.1}%)", mode.scale(used as f64)));
    }
    Report::new(status, message)
}

fn measure(args: &Args) -> Result<Report, CheckError> {
    let params = args.connection.resolve()?;
    let mut server = Server::connect(&params)?;
    let max = server.variable_u64("max_connections")?;
    let used = server.global_status_u64("Threads_connected")?;
    Ok(do_check(args, used, max))
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    sensu_mysql::logging::init(args.verbose);
    sensu_mysql::run(|| measure(&args)).print_and_exit("check-mysql-connections");
}

#[cfg(test)]
mod test {
    use structopt::StructOpt;

    use super::{do_check, Args};
    use sensu_mysql::Status;

    fn build_args(argv: Vec<&str>) -> Args {
        Args::from_iter(argv.into_iter())
    }

    #[test]
    fn flags() {
        let args = build_args(vec!["check-mysql-connections"]);
        assert_eq!(args.warn, 100.0);
        assert_eq!(args.crit, 128.0);
        assert_eq!(args.percentage, false);
        assert_eq!(args.connection.port, 3306);

        let args = build_args(vec![
            "check-mysql-connections",
            "-H",
            "db01",
            "-w",
            "80",
            "-c",
            "95",
            "-a",
        ]);
        assert_eq!(args.connection.hostname, Some("db01".to_owned()));
        assert_eq!(args.warn, 80.0);
        assert_eq!(args.crit, 95.0);
        assert_eq!(args.percentage, true);
    }

    #[test]
    fn absolute_counts() {
        let args = build_args(vec!["check-mysql-connections", "-w", "80", "-c", "100"]);
        let report = do_check(&args, 95, 100);
        assert_eq!(report.status, Status::Warning);
        assert_eq!(report.message, "Max connections reached in MySQL: 95 out of 100");

        let report = do_check(&args, 100, 100);
        assert_eq!(report.status, Status::Critical);

        let report = do_check(&args, 12, 100);
        assert_eq!(report.status, Status::Ok);
        assert_eq!(
            report.message,
            "Max connections is under limit in MySQL: 12 out of 100"
        );
    }

    #[test]
    fn percentage_of_max() {
        let args = build_args(vec![
            "check-mysql-connections",
            "--percentage",
            "-w",
            "80",
            "-c",
            "95",
        ]);
        let report = do_check(&args, 150, 100);
        assert_eq!(report.status, Status::Critical);
        assert_eq!(
            report.message,
            "Max connections reached in MySQL: 150 out of 100 (150.0%)"
        );

        let report = do_check(&args, 121, 151);
        assert_eq!(report.status, Status::Warning);

        let report = do_check(&args, 40, 151);
        assert_eq!(report.status, Status::Ok);
        assert_eq!(
            report.message,
            "Max connections is under limit in MySQL: 40 out of 151 (26.5%)"
        );
    }
}
