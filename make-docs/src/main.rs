//! Regenerate `src/scripts.rs` from the `--help` of every binary
//!
//! Run from the workspace root after `cargo build`:
//!
//!     cargo run -p make-docs > src/scripts.rs

use std::io;
use std::process::Command;

struct Script {
    name: &'static str,
    about: &'static str,
}

const SCRIPTS: &[Script] = &[
    Script {
        name: "check-mysql-connections",
        about: "Needs `SHOW VARIABLES` and `SHOW GLOBAL STATUS`.",
    },
    Script {
        name: "check-mysql-threads",
        about: "Needs `SHOW GLOBAL STATUS`.",
    },
    Script {
        name: "check-mysql-replication-status",
        about: "Needs the `REPLICATION CLIENT` privilege. Passes on servers that are not replicas.",
    },
    Script {
        name: "check-mysql-disk",
        about: "Reads `information_schema.TABLES`, so the user only sees schemas it has access to.",
    },
    Script {
        name: "metrics-mysql-graphite",
        about: "Prints graphite plaintext samples, one per line. Replica metrics need \
                `REPLICATION CLIENT`, or pass `--no-slave`.",
    },
];

fn main() -> io::Result<()> {
    let preamble = "Documentation about the various scripts contained herein\n\n\
                    Every script takes the same connection flags. When `--ini` is given, \
                    each value in its `[client]`\nsection overrides the matching flag.\n";

    let mut out: String = cp(preamble.split('\n'));
    out.push_str("\n");
    out.push_str(&cp(SCRIPTS.iter().map(|s| format!("- [{0}](#{0})", s.name))));
    out.push_str("\n");
    for script in SCRIPTS {
        out.push_str(&format!(
            "\
//!
//! # {0}
//!
//! {1}
//!
//! ```plain
//! $ {0} --help
",
            script.name, script.about
        ));
        let output = Command::new(&format!("target/debug/{}", script.name))
            .args(&["--help"])
            .output()?;
        let help = String::from_utf8(output.stdout).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} --help is not utf8: {}", script.name, e),
            )
        })?;
        out.push_str(&cp(help.trim_end().split('\n')));
        out.push_str("\n//! ```\n");
    }
    print!("{}", out);
    Ok(())
}

/// Comment each line in the iterator
fn cp<S: AsRef<str>, I: Iterator<Item = S>>(s: I) -> String {
    s.map(|s| format!("//! {}", s.as_ref()))
        .map(|s| s.trim().into())
        .collect::<Vec<String>>()
        .join("\n")
}
