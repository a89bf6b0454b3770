use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Sponge used by the `hash` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpongeArg {
    Curl27,
    Curl81,
    Kerl,
}

impl FromStr for SpongeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "curl27" => Ok(SpongeArg::Curl27),
            "curl81" | "curl" => Ok(SpongeArg::Curl81),
            "kerl" => Ok(SpongeArg::Kerl),
            _ => Err(format!(
                "Invalid sponge: {s}. Valid options: curl27, curl81, kerl"
            )),
        }
    }
}

impl std::fmt::Display for SpongeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpongeArg::Curl27 => write!(f, "curl27"),
            SpongeArg::Curl81 => write!(f, "curl81"),
            SpongeArg::Kerl => write!(f, "kerl"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ternary-chain")]
pub struct Opt {
    #[arg(long, global = true, help = "Log at debug level")]
    pub verbose: bool,
    #[arg(long, global = true, help = "TOML file with settings")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "newseed", about = "Generate a random seed")]
    Newseed,
    #[command(name = "address", about = "Derive an address from a seed")]
    Address {
        #[arg(help = "Seed trytes, padded to 81")]
        seed: String,
        #[arg(long, default_value_t = 0, help = "Key index")]
        index: u64,
        #[arg(long, help = "Security level 1-3, defaults to the configured one")]
        security: Option<u8>,
        #[arg(long, help = "Append the 9-tryte checksum")]
        checksum: bool,
        #[arg(long, default_value_t = 1, help = "Number of consecutive addresses")]
        total: u64,
    },
    #[command(
        name = "checksum",
        about = "Append a checksum to an 81-tryte address or verify a 90-tryte one"
    )]
    Checksum {
        #[arg(help = "Address trytes")]
        address: String,
    },
    #[command(name = "hash", about = "Hash trytes, padded to a multiple of 81")]
    Hash {
        #[arg(help = "Trytes to hash")]
        trytes: String,
        #[arg(
            long,
            help = "Sponge (curl27, curl81, kerl), defaults to the configured Curl"
        )]
        sponge: Option<SpongeArg>,
    },
    #[command(name = "parsetx", about = "Decode transaction trytes as JSON")]
    Parsetx {
        #[arg(help = "2673 transaction trytes")]
        trytes: String,
    },
    #[command(name = "pow", about = "Search a nonce and print the attached trytes")]
    Pow {
        #[arg(help = "2673 transaction trytes")]
        trytes: String,
        #[arg(long, help = "Minimum weight magnitude, defaults to the configured one")]
        mwm: Option<usize>,
        #[arg(long, help = "Worker threads, 0 for one per core")]
        threads: Option<usize>,
    },
    #[command(name = "normalize", about = "Print the normalized form of a bundle hash")]
    Normalize {
        #[arg(help = "81-tryte bundle hash")]
        bundle_hash: String,
    },
    #[command(name = "tobytes", about = "Print the 48-byte form of a hash as hex")]
    Tobytes {
        #[arg(help = "81-tryte hash")]
        hash: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sponge_arg() {
        assert_eq!("KERL".parse::<SpongeArg>().unwrap(), SpongeArg::Kerl);
        assert_eq!("curl".parse::<SpongeArg>().unwrap(), SpongeArg::Curl81);
        assert!("sha256".parse::<SpongeArg>().is_err());
        assert_eq!(SpongeArg::Curl27.to_string(), "curl27");
    }

    #[test]
    fn test_parse_commands() {
        let opt = Opt::parse_from(["ternary-chain", "--verbose", "hash", "ABC", "--sponge", "kerl"]);
        assert!(opt.verbose);
        match opt.command {
            Command::Hash { trytes, sponge } => {
                assert_eq!(trytes, "ABC");
                assert_eq!(sponge, Some(SpongeArg::Kerl));
            }
            other => panic!("unexpected command {other:?}"),
        }

        let opt = Opt::parse_from(["ternary-chain", "address", "SEED", "--index", "4"]);
        match opt.command {
            Command::Address {
                index,
                security,
                checksum,
                total,
                ..
            } => {
                assert_eq!(index, 4);
                assert_eq!(security, None);
                assert!(!checksum);
                assert_eq!(total, 1);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
