// This is my main entry point for the ternary toolkit CLI
// Every command is a thin wrapper over one library operation
use clap::Parser;
use data_encoding::HEXLOWER;
use log::{error, info, LevelFilter};
use std::process;
use ternary_chain::core::constants::{ADDRESS_LENGTH, HASH_LENGTH, HASH_LENGTH_TRITS};
use ternary_chain::trinary::pad_trytes;
use ternary_chain::{
    add_checksum, is_valid_checksum, normalized_bundle, to_json, trits_to_bytes,
    trits_to_trytes, trytes_to_trits, Command, Curl, CurlMode, Kerl, Opt, ProofOfWork, Seed,
    Sponge, SpongeArg, Transaction, GLOBAL_CONFIG,
};

fn main() {
    let opt = Opt::parse();

    // Info is enough detail by default, --verbose shows the debug lines too
    let level = if opt.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder().filter_level(level).init();

    if let Some(path) = &opt.config {
        if let Err(e) = GLOBAL_CONFIG.load_file(path) {
            error!("Error: {e}");
            process::exit(1);
        }
    }

    // If something goes wrong, I log the error and exit with code 1
    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Newseed => {
            let seed = Seed::random(GLOBAL_CONFIG.get_security_level())?;
            println!("{}", seed.get_trytes());
        }
        Command::Address {
            seed,
            index,
            security,
            checksum,
            total,
        } => {
            let security = security.unwrap_or_else(|| GLOBAL_CONFIG.get_security_level());
            let seed = Seed::new(&seed, security)?;
            for mut address in seed.new_addresses(index, total, checksum)? {
                if checksum {
                    println!("{}", address.get_address_with_checksum()?);
                } else {
                    println!("{}", address.get_address());
                }
            }
        }
        Command::Checksum { address } => {
            if address.len() == ADDRESS_LENGTH {
                println!("{}", add_checksum(&address)?);
            } else if is_valid_checksum(&address) {
                println!("Checksum is valid");
            } else {
                return Err(format!("Invalid checksum: {address}").into());
            }
        }
        Command::Hash { trytes, sponge } => {
            // Sponges only take whole 243-trit blocks
            let padded_len = trytes.len().div_ceil(HASH_LENGTH).max(1) * HASH_LENGTH;
            let trits = trytes_to_trits(&pad_trytes(&trytes, padded_len))?;
            let hash = match sponge {
                Some(SpongeArg::Curl27) => Curl::new(CurlMode::CurlP27).hash(&trits)?,
                Some(SpongeArg::Curl81) => Curl::new(CurlMode::CurlP81).hash(&trits)?,
                Some(SpongeArg::Kerl) => Kerl::new().hash(&trits)?,
                None => Curl::new(GLOBAL_CONFIG.get_curl_mode()).hash(&trits)?,
            };
            println!("{}", trits_to_trytes(&hash)?);
        }
        Command::Parsetx { trytes } => {
            let transaction = Transaction::from_trytes(&trytes)?;
            println!("{}", to_json(&transaction)?);
        }
        Command::Pow {
            trytes,
            mwm,
            threads,
        } => {
            let mwm = mwm.unwrap_or_else(|| GLOBAL_CONFIG.get_min_weight_magnitude());
            let threads = threads.unwrap_or_else(|| GLOBAL_CONFIG.get_pow_threads());
            let pow = ProofOfWork::new();
            match pow.attach(&trytes, mwm, threads)? {
                Some(attached) => {
                    let transaction = Transaction::from_trytes(&attached)?;
                    info!(
                        "Transaction {} has weight {}",
                        transaction.get_hash(),
                        transaction.weight_magnitude()?
                    );
                    println!("{attached}");
                }
                None => return Err("Proof of work was interrupted".into()),
            }
        }
        Command::Normalize { bundle_hash } => {
            let normalized = normalized_bundle(&bundle_hash)?;
            for group in normalized.chunks(HASH_LENGTH / 3) {
                let values: Vec<String> = group.iter().map(|v| v.to_string()).collect();
                println!("{}", values.join(" "));
            }
        }
        Command::Tobytes { hash } => {
            let trits = trytes_to_trits(&hash)?;
            if trits.len() != HASH_LENGTH_TRITS {
                return Err(format!("Expected {HASH_LENGTH} trytes, got {}", hash.len()).into());
            }
            println!("{}", HEXLOWER.encode(&trits_to_bytes(&trits)?));
        }
    }
    Ok(())
}
