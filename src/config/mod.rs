use std::{path::PathBuf, time::Duration};

use clap::{App, Arg};

use crate::SumdResult;
use anyhow::anyhow;

// The reference trio; any number of parties >= 1 is accepted.
const DEFAULT_PARTIES: &[&str] = &["alice=30", "bob=300", "carol=100"];

/// One participant of the protocol: a uid and its private input.
#[derive(Clone, Debug)]
pub struct PartyConfig {
    pub name: String,
    pub input: i64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub parties: Vec<PartyConfig>,
    pub call_timeout: Duration,
    /// Directory holding `server-cert.pem`, `server-key.pem` and
    /// `ca-cert.pem`. Plaintext transport when absent.
    pub certs_dir: Option<PathBuf>,
}

pub fn parse_args() -> SumdResult<Config> {
    let matches = App::new("sumd")
        .about("An additive secret-sharing sum relay daemon")
        .arg(
            Arg::with_name("port")
                .long("port")
                .short("p")
                .required(false)
                .default_value("50051"),
        )
        .arg(
            Arg::with_name("party")
                .long("party")
                .help("participant as NAME=VALUE; repeat once per participant")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .required(false),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .help("per-call timeout in seconds")
                .required(false)
                .default_value("10"),
        )
        .arg(
            Arg::with_name("certs")
                .long("certs")
                .help("certificate directory; enables TLS")
                .takes_value(true)
                .required(false),
        )
        .get_matches();

    let port = matches
        .value_of("port")
        .ok_or_else(|| anyhow!("port value"))?
        .parse::<u16>()?;

    let timeout_secs = matches
        .value_of("timeout")
        .ok_or_else(|| anyhow!("timeout value"))?
        .parse::<u64>()?;

    let parties = match matches.values_of("party") {
        Some(values) => values.map(parse_party).collect::<SumdResult<Vec<_>>>()?,
        None => DEFAULT_PARTIES
            .iter()
            .copied()
            .map(parse_party)
            .collect::<SumdResult<Vec<_>>>()?,
    };

    for (i, party) in parties.iter().enumerate() {
        if parties[..i].iter().any(|p| p.name == party.name) {
            return Err(anyhow!("duplicate participant name [{}]", party.name));
        }
    }

    let certs_dir = matches.value_of("certs").map(PathBuf::from);

    Ok(Config {
        port,
        parties,
        call_timeout: Duration::from_secs(timeout_secs),
        certs_dir,
    })
}

fn parse_party(arg: &str) -> SumdResult<PartyConfig> {
    let (name, input) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("malformed party [{}]: expected NAME=VALUE", arg))?;
    if name.is_empty() {
        return Err(anyhow!("malformed party [{}]: empty name", arg));
    }
    let input = input
        .parse::<i64>()
        .map_err(|err| anyhow!("malformed party [{}]: {}", arg, err))?;
    Ok(PartyConfig {
        name: name.to_string(),
        input,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_party;

    #[test]
    fn party_args_parse() {
        let party = parse_party("alice=30").unwrap();
        assert_eq!(party.name, "alice");
        assert_eq!(party.input, 30);

        let party = parse_party("bob=-42").unwrap();
        assert_eq!(party.input, -42);

        assert!(parse_party("no-value").is_err());
        assert!(parse_party("=7").is_err());
        assert!(parse_party("carol=one").is_err());
    }
}
