use crate::*;
use num_bigint::BigUint;
use rand::Rng;
use std::env::var;
use std::time::Duration;

/// Smallest modulus accepted for a voting group.
pub const MIN_KEYBITS: u64 = 16;

/// Modulus size used when none is configured.
pub const DEFAULT_KEYBITS: u64 = 256;

pub const DEFAULT_AUTHORITY_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Bit length of the safe prime generated for each voting.
    pub keybits: u64,

    /// A fixed group shared by every voting, instead of generating one.
    pub group: Option<GroupParams>,

    /// Deadline for a single call to a remote authority.
    pub authority_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keybits: DEFAULT_KEYBITS,
            group: None,
            authority_timeout: Duration::from_secs(DEFAULT_AUTHORITY_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| var(name).ok())
    }

    /// Build a config from any variable source. Unset variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let keybits: u64 = match lookup("DECIDE_KEYBITS") {
            Some(val) => val
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("DECIDE_KEYBITS: {}", e)))?,
            None => DEFAULT_KEYBITS,
        };
        if keybits < MIN_KEYBITS {
            return Err(Error::Config(format!(
                "DECIDE_KEYBITS must be at least {}, got {}",
                MIN_KEYBITS, keybits
            )));
        }

        let group = match (lookup("DECIDE_GROUP_P"), lookup("DECIDE_GROUP_G")) {
            (Some(p), Some(g)) => Some(GroupParams::new(
                parse_hex("DECIDE_GROUP_P", &p)?,
                parse_hex("DECIDE_GROUP_G", &g)?,
            )),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "DECIDE_GROUP_P and DECIDE_GROUP_G must be set together".into(),
                ))
            }
        };

        let authority_timeout = match lookup("DECIDE_AUTHORITY_TIMEOUT_SECS") {
            Some(val) => Duration::from_secs(
                val.trim()
                    .parse()
                    .map_err(|e| Error::Config(format!("DECIDE_AUTHORITY_TIMEOUT_SECS: {}", e)))?,
            ),
            None => Duration::from_secs(DEFAULT_AUTHORITY_TIMEOUT_SECS),
        };

        Ok(Config {
            keybits,
            group,
            authority_timeout,
        })
    }

    /// Group parameters for a new voting: the fixed group after validation,
    /// or a freshly generated one.
    pub fn group_params<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GroupParams, Error> {
        match &self.group {
            Some(group) => {
                group.validate(self.keybits)?;
                Ok(group.clone())
            }
            None => GroupParams::generate(self.keybits, rng),
        }
    }
}

fn parse_hex(name: &str, val: &str) -> Result<BigUint, Error> {
    let val = val.trim().trim_start_matches("0x");
    let val = if val.len() % 2 == 1 {
        format!("0{}", val)
    } else {
        val.to_owned()
    };
    let bytes = hex::decode(&val).map_err(|e| Error::Config(format!("{}: {}", name, e)))?;
    Ok(BigUint::from_bytes_be(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{rng, small_group};
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.keybits, 256);
        assert_eq!(config.authority_timeout, Duration::from_secs(30));
    }

    #[test]
    fn fixed_group() {
        let config = Config::from_lookup(lookup(&[
            ("DECIDE_KEYBITS", "64"),
            ("DECIDE_GROUP_P", "0xa4e4e25a2bf9133f"),
            ("DECIDE_GROUP_G", "9"),
            ("DECIDE_AUTHORITY_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.group, Some(small_group()));
        assert_eq!(config.authority_timeout, Duration::from_secs(5));

        let mut rng = rng(20);
        assert_eq!(config.group_params(&mut rng).unwrap(), small_group());

        // A fixed group smaller than the configured size is refused
        let config = Config {
            keybits: 128,
            ..config
        };
        assert!(config.group_params(&mut rng).is_err());
    }

    #[test]
    fn generated_group() {
        let config = Config {
            keybits: 32,
            ..Config::default()
        };
        let mut rng = rng(21);
        let group = config.group_params(&mut rng).unwrap();
        assert_eq!(group.p.bits(), 32);
    }

    #[test]
    fn invalid_values() {
        assert!(Config::from_lookup(lookup(&[("DECIDE_KEYBITS", "8")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DECIDE_KEYBITS", "many")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DECIDE_GROUP_P", "ff")])).is_err());
        let bad_hex = lookup(&[("DECIDE_GROUP_P", "zz"), ("DECIDE_GROUP_G", "2")]);
        assert!(Config::from_lookup(bad_hex).is_err());
        assert!(Config::from_lookup(lookup(&[("DECIDE_AUTHORITY_TIMEOUT_SECS", "-1")])).is_err());
    }
}
