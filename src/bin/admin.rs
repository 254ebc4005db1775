use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use sales_auth::{Claims, KeyStore, Role, TokenAuthority};
use sales_core::hash_password;

#[derive(Parser)]
#[command(name = "sales-admin")]
#[command(about = "Sales API admin tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a signed token for a subject
    Gentoken {
        /// Directory holding <kid>.pem and <kid>.pub.pem files
        #[arg(long, default_value = "zarf/keys")]
        keys_folder: PathBuf,

        /// Key id to sign with
        #[arg(long)]
        kid: String,

        /// Subject (user id) of the token
        #[arg(long)]
        subject: String,

        /// Comma-separated roles, e.g. ADMIN,USER
        #[arg(long, value_delimiter = ',', default_value = "USER")]
        roles: Vec<String>,

        /// Lifetime in seconds, at least 1
        #[arg(long, default_value_t = 3600, value_parser = clap::value_parser!(i64).range(1..))]
        ttl: i64,

        /// Issuer claim
        #[arg(long, default_value = "sales api")]
        issuer: String,

        /// Signing algorithm; must match the service's SALES_AUTH_ALGORITHM
        #[arg(long, default_value = "RS256")]
        algorithm: String,
    },
    /// Print a bcrypt hash of a password
    Hashpw {
        password: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    match Cli::parse().command {
        Commands::Gentoken {
            keys_folder,
            kid,
            subject,
            roles,
            ttl,
            issuer,
            algorithm,
        } => {
            let token = gentoken(&keys_folder, kid, subject, &roles, ttl, issuer, &algorithm)?;
            println!("{token}");
        }
        Commands::Hashpw { password } => {
            println!("{}", hash_password(&password)?);
        }
    }

    Ok(())
}

fn gentoken(
    keys_folder: &Path,
    kid: String,
    subject: String,
    roles: &[String],
    ttl: i64,
    issuer: String,
    algorithm: &str,
) -> anyhow::Result<String> {
    let roles = roles
        .iter()
        .map(|r| r.trim().parse::<Role>())
        .collect::<Result<Vec<_>, _>>()?;
    let ttl = TimeDelta::try_seconds(ttl)
        .filter(|ttl| *ttl > TimeDelta::zero())
        .context("ttl must be a positive number of seconds")?;
    let algorithm = TokenAuthority::parse_algorithm(algorithm)?;

    let keys = Arc::new(
        KeyStore::from_dir(keys_folder)
            .with_context(|| format!("loading keys from {}", keys_folder.display()))?,
    );
    let authority = TokenAuthority::with_algorithm(keys, kid, algorithm)?;

    let claims = Claims::new(subject, roles, issuer, ttl, Utc::now());
    Ok(authority.issue(&claims)?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use jsonwebtoken::{Algorithm, decode_header};
    use sales_auth::testutil::{ACTIVE_KID, private_pem, public_pem};
    use tempfile::TempDir;

    use super::*;

    fn keys_folder() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("k1.pem"), private_pem(ACTIVE_KID)).unwrap();
        fs::write(tmp.path().join("k1.pub.pem"), public_pem(ACTIVE_KID)).unwrap();
        tmp
    }

    #[test]
    fn test_gentoken_signs_with_requested_algorithm() {
        let tmp = keys_folder();
        let roles = vec!["ADMIN".to_string()];

        let token = gentoken(tmp.path(), "k1".into(), "u1".into(), &roles, 60, "sales api".into(), "PS384")
            .unwrap();

        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::PS384);
        assert_eq!(header.kid.as_deref(), Some("k1"));
    }

    #[test]
    fn test_gentoken_rejects_unsupported_algorithm() {
        let tmp = keys_folder();
        let roles = vec!["USER".to_string()];

        assert!(gentoken(tmp.path(), "k1".into(), "u1".into(), &roles, 60, "sales api".into(), "HS256").is_err());
    }

    #[test]
    fn test_gentoken_rejects_non_positive_ttl() {
        let tmp = keys_folder();
        let roles = vec!["USER".to_string()];

        for ttl in [0, -60] {
            assert!(gentoken(tmp.path(), "k1".into(), "u1".into(), &roles, ttl, "sales api".into(), "RS256").is_err());
        }
    }

    #[test]
    fn test_cli_rejects_negative_ttl() {
        let parsed = Cli::try_parse_from([
            "sales-admin", "gentoken", "--kid", "k1", "--subject", "u1", "--ttl", "-5",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "sales-admin", "gentoken", "--kid", "k1", "--subject", "u1", "--algorithm", "PS256",
        ]);
        assert!(parsed.is_ok());
    }
}
