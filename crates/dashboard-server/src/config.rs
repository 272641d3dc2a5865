use std::{
    env,
    net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
    time::Duration,
};

use market_sim::{Instrument, ParseInstrumentError, ParseTimeRangeError, TimeRange};
use runtime::DEFAULT_REFRESH_INTERVAL;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

const ADDR_KEY: &str = "DASHBOARD_ADDR";
const REFRESH_KEY: &str = "DASHBOARD_REFRESH_MS";
const INSTRUMENT_KEY: &str = "DASHBOARD_INSTRUMENT";
const RANGE_KEY: &str = "DASHBOARD_RANGE";
const SEED_KEY: &str = "DASHBOARD_SEED";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub refresh_interval: Duration,
    pub instrument: Instrument,
    pub range: TimeRange,
    /// Fixed RNG seed for reproducible runs; entropy when unset.
    pub seed: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DASHBOARD_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("DASHBOARD_REFRESH_MS must be a positive whole number of milliseconds")]
    InvalidRefreshInterval,
    #[error("DASHBOARD_INSTRUMENT is not a known instrument: {0}")]
    InvalidInstrument(#[source] ParseInstrumentError),
    #[error("DASHBOARD_RANGE is not a known range: {0}")]
    InvalidRange(#[source] ParseTimeRangeError),
    #[error("DASHBOARD_SEED must be an unsigned 64-bit integer")]
    InvalidSeed,
    #[error("{0} contains non-unicode data")]
    NonUnicode(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = parse_env(ADDR_KEY, ConfigError::InvalidListenAddr)?
            .unwrap_or(DEFAULT_LISTEN_ADDR);

        let refresh_interval =
            match parse_env::<u64, _>(REFRESH_KEY, |_| ConfigError::InvalidRefreshInterval)? {
                Some(0) => return Err(ConfigError::InvalidRefreshInterval),
                Some(ms) => Duration::from_millis(ms),
                None => DEFAULT_REFRESH_INTERVAL,
            };

        let instrument =
            parse_env(INSTRUMENT_KEY, ConfigError::InvalidInstrument)?.unwrap_or_default();
        let range = parse_env(RANGE_KEY, ConfigError::InvalidRange)?.unwrap_or_default();
        let seed = parse_env(SEED_KEY, |_| ConfigError::InvalidSeed)?;

        Ok(Self {
            listen_addr,
            refresh_interval,
            instrument,
            range,
            seed,
        })
    }
}

/// Reads `key` and parses it, returning `None` when the variable is unset.
fn parse_env<T, F>(key: &'static str, invalid: F) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: FnOnce(T::Err) -> ConfigError,
{
    match env::var(key) {
        Ok(value) => value.trim().parse().map(Some).map_err(invalid),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}

#[cfg(test)]
mod tests {
    use std::{env, sync::Mutex, time::Duration};

    use market_sim::{Instrument, TimeRange};

    use super::{Config, ConfigError, ADDR_KEY, INSTRUMENT_KEY, RANGE_KEY, REFRESH_KEY, SEED_KEY};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }

        fn unset(key: &'static str) -> Self {
            let previous = env::var_os(key);
            env::remove_var(key);
            Self { key, previous }
        }

        #[cfg(unix)]
        fn set_os(key: &'static str, value: std::ffi::OsString) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.previous.take() {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    fn reset_config_env_baseline() -> [EnvVarGuard; 5] {
        [
            EnvVarGuard::unset(ADDR_KEY),
            EnvVarGuard::unset(REFRESH_KEY),
            EnvVarGuard::unset(INSTRUMENT_KEY),
            EnvVarGuard::unset(RANGE_KEY),
            EnvVarGuard::unset(SEED_KEY),
        ]
    }

    #[test]
    fn defaults_when_env_is_unset() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.refresh_interval, Duration::from_secs(5));
        assert_eq!(config.instrument, Instrument::UsdBtc);
        assert_eq!(config.range, TimeRange::SevenDays);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn uses_overrides_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _addr = EnvVarGuard::set(ADDR_KEY, "127.0.0.1:9090");
        let _refresh = EnvVarGuard::set(REFRESH_KEY, "250");
        let _instrument = EnvVarGuard::set(INSTRUMENT_KEY, "eth/btc");
        let _range = EnvVarGuard::set(RANGE_KEY, "1Y");
        let _seed = EnvVarGuard::set(SEED_KEY, " 42 ");

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.refresh_interval, Duration::from_millis(250));
        assert_eq!(config.instrument, Instrument::EthBtc);
        assert_eq!(config.range, TimeRange::OneYear);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn returns_error_for_invalid_listen_address_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ADDR_KEY, "not-an-addr");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidListenAddr(_)));
    }

    #[test]
    fn rejects_zero_and_garbage_refresh_intervals() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        for value in ["0", "-5", "soon"] {
            let _guard = EnvVarGuard::set(REFRESH_KEY, value);
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRefreshInterval), "{value}");
        }
    }

    #[test]
    fn returns_error_for_unknown_instrument_and_range() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        {
            let _guard = EnvVarGuard::set(INSTRUMENT_KEY, "DOGE/BTC");
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidInstrument(_)));
        }

        let _guard = EnvVarGuard::set(RANGE_KEY, "2W");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange(_)));
    }

    #[test]
    fn returns_error_for_invalid_seed() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(SEED_KEY, "-1");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidSeed));
    }

    #[cfg(unix)]
    #[test]
    fn returns_error_for_non_unicode_env_var() {
        use std::os::unix::ffi::OsStringExt;

        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set_os(
            RANGE_KEY,
            std::ffi::OsString::from_vec(vec![0x66, 0x6f, 0x80]),
        );

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::NonUnicode(RANGE_KEY)));
        assert_eq!(err.to_string(), "DASHBOARD_RANGE contains non-unicode data");
    }
}
