//! Print MySQL status counters as graphite plaintext
//!
//! Every line shares one timestamp. Nothing but samples is written to
//! stdout, so the output can be piped straight to a carbon relay.

use serde::Deserialize;
use structopt::StructOpt;

use sensu_mysql::connection::{ConnectionArgs, ConnectionParams};
use sensu_mysql::metrics::{self, Emitter, Sample};
use sensu_mysql::replication::ReplicaStatus;
use sensu_mysql::server::Server;
use sensu_mysql::{CheckError, Report};

/// Emit MySQL status counters and configuration as graphite samples
#[derive(Deserialize, Debug, StructOpt)]
#[structopt(
    name = "metrics-mysql-graphite (part of sensu-mysql)",
    raw(setting = "structopt::clap::AppSettings::ColoredHelp")
)]
struct Args {
    #[structopt(flatten)]
    connection: ConnectionArgs,
    #[structopt(
        short = "S",
        long = "scheme",
        help = "Metric naming scheme, text to prepend to metric [default: <hostname>.mysql]"
    )]
    scheme: Option<String>,
    #[structopt(
        short = "A",
        long = "scheme-append",
        help = "Text appended to the scheme [default: the MySQL host]"
    )]
    scheme_append: Option<String>,
    #[structopt(
        short = "n",
        long = "no-slave",
        help = "Skip replica metrics, for servers without REPLICATION CLIENT"
    )]
    no_slave: bool,
    #[structopt(short = "v", long = "verbose", help = "Log what is being queried")]
    verbose: bool,
}

fn scheme_append(args: &Args, params: &ConnectionParams) -> String {
    args.scheme_append
        .clone()
        .or_else(|| params.host.clone())
        .unwrap_or_else(|| "localhost".to_owned())
}

/// The first replica row, unless disabled or unavailable
fn first_replica<F>(args: &Args, fetch: F) -> Option<ReplicaStatus>
where
    F: FnOnce() -> Result<Vec<ReplicaStatus>, CheckError>,
{
    if args.no_slave {
        return None;
    }
    match fetch() {
        Ok(channels) => channels.into_iter().next(),
        Err(e) => {
            tracing::warn!(error = %e, "skipping replica metrics");
            None
        }
    }
}

fn collect(
    emitter: &Emitter,
    status: &[(String, Option<String>)],
    replica: Option<&ReplicaStatus>,
    variables: &[(String, Option<String>)],
) -> Vec<Sample> {
    let mut samples = emitter.status_samples(status);
    if let Some(replica) = replica {
        samples.extend(emitter.replica_samples(replica));
    }
    samples.extend(emitter.configuration_samples(variables));
    samples
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    sensu_mysql::logging::init(args.verbose);
    sensu_mysql::run(|| -> Result<Report, CheckError> {
        let timestamp = chrono::Utc::now().timestamp();
        let params = args.connection.resolve()?;
        let scheme = match args.scheme {
            Some(ref scheme) => scheme.clone(),
            None => metrics::default_scheme()?,
        };
        let emitter = Emitter::new(&scheme, &scheme_append(&args, &params), timestamp);

        let mut server = Server::connect(&params)?;
        let status = server.global_status_all()?;
        let replica = first_replica(&args, || server.replica_status());
        let variables = server.global_variables_all()?;

        for sample in collect(&emitter, &status, replica.as_ref(), &variables) {
            println!("{}", sample);
        }
        Ok(Report::ok(""))
    })
    .print_and_exit("metrics-mysql-graphite");
}
