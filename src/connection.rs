//! Figure out how to reach the server
//!
//! Credentials come from two places: command line flags, and the `[client]`
//! section of a my.cnf style file passed with `--ini`. Each field is
//! resolved on its own: a value in the file wins, then the flag, and if
//! neither has it the client library default applies.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use mysql::{Opts, OptsBuilder};
use serde::Deserialize;
use structopt::StructOpt;

use crate::CheckError;

/// Flags shared by every script, flattened into each one's `Args`
#[derive(StructOpt, Deserialize, Debug, Clone, PartialEq)]
pub struct ConnectionArgs {
    #[structopt(short = "H", long = "hostname", help = "Hostname to login to")]
    pub hostname: Option<String>,
    #[structopt(short = "u", long = "user", help = "MySQL User")]
    pub user: Option<String>,
    #[structopt(short = "p", long = "password", help = "MySQL Password")]
    pub password: Option<String>,
    #[structopt(
        short = "P",
        long = "port",
        help = "Port to connect to",
        default_value = "3306"
    )]
    pub port: u16,
    #[structopt(short = "d", long = "database", help = "Database schema to connect to")]
    pub database: Option<String>,
    #[structopt(
        short = "i",
        long = "ini",
        help = "My.cnf ini file, its [client] section overrides the flags",
        parse(from_os_str)
    )]
    pub ini: Option<PathBuf>,
    #[structopt(short = "s", long = "socket", help = "Socket to use")]
    pub socket: Option<String>,
}

impl ConnectionArgs {
    /// Read the ini file, if any, and merge it with the flags
    pub fn resolve(&self) -> Result<ConnectionParams, CheckError> {
        let section = match self.ini {
            Some(ref path) => ClientSection::load(path)?,
            None => ClientSection::default(),
        };
        Ok(ConnectionParams::resolve(self, &section))
    }
}

/// The `[client]` section of a my.cnf file
///
/// Keys that are missing or empty are `None`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClientSection {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub port: Option<u16>,
    pub socket: Option<String>,
}

impl ClientSection {
    pub fn load(path: &Path) -> Result<ClientSection, CheckError> {
        let contents = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded ini file");
        ClientSection::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<ClientSection, CheckError> {
        let ini = Ini::load_from_str(&normalise(contents))?;
        ClientSection::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<ClientSection, CheckError> {
        let props = match ini.section(Some("client")) {
            Some(props) => props,
            None => {
                tracing::warn!("ini file has no [client] section, using flags only");
                return Ok(ClientSection::default());
            }
        };
        let get = |key: &str| {
            props
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        let port = match get("port") {
            Some(port) => Some(
                port.parse::<u16>()
                    .map_err(|e| CheckError::invalid("port in ini file", &port, e))?,
            ),
            None => None,
        };
        Ok(ClientSection {
            host: get("host"),
            user: get("user"),
            password: get("password"),
            database: get("database"),
            port,
            socket: get("socket"),
        })
    }
}

/// Rewrite my.cnf syntax that `rust-ini` misreads
///
/// Bare options such as `skip-ssl` become `skip-ssl=`, trailing comments
/// outside quotes are dropped, and `!include` directives are skipped.
fn normalise(contents: &str) -> String {
    let mut out = String::with_capacity(contents.len());
    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('!') {
            tracing::debug!(directive = trimmed, "ignoring ini directive");
            continue;
        }
        let line = strip_comment(trimmed).trim_end();
        if line.is_empty() || line.starts_with('[') || line.contains('=') {
            out.push_str(line);
        } else {
            out.push_str(line);
            out.push('=');
        }
        out.push('\n');
    }
    out
}

/// Everything before the first `#` or `;` that is not inside quotes
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '#') | (None, ';') => return &line[..i],
            (None, '"') | (None, '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            _ => {}
        }
    }
    line
}

/// Everything needed to open a connection
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConnectionParams {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub port: Option<u16>,
    pub socket: Option<String>,
}

impl ConnectionParams {
    /// Per field: the file if it has a value, else the flag, else unset
    pub fn resolve(args: &ConnectionArgs, section: &ClientSection) -> ConnectionParams {
        ConnectionParams {
            host: section.host.clone().or_else(|| args.hostname.clone()),
            user: section.user.clone().or_else(|| args.user.clone()),
            password: section.password.clone().or_else(|| args.password.clone()),
            database: section.database.clone().or_else(|| args.database.clone()),
            port: section.port.or(Some(args.port)),
            socket: section.socket.clone().or_else(|| args.socket.clone()),
        }
    }
}

/// Where we are connecting, without credentials
impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref socket) = self.socket {
            return write!(f, "socket {}", socket);
        }
        write!(
            f,
            "{}:{}",
            self.host.as_ref().map_or("127.0.0.1", String::as_str),
            self.port.unwrap_or(3306)
        )
    }
}

impl<'a> From<&'a ConnectionParams> for Opts {
    fn from(params: &'a ConnectionParams) -> Opts {
        let builder = OptsBuilder::new()
            .ip_or_hostname(params.host.clone())
            .user(params.user.clone())
            .pass(params.password.clone())
            .db_name(params.database.clone())
            .socket(params.socket.clone());
        let builder = match params.port {
            Some(port) => builder.tcp_port(port),
            None => builder,
        };
        Opts::from(builder)
    }
}
