// src/config.rs
use std::path::PathBuf;

pub const FULL_RANDOM_ENV: &str = "INDUS_XLIT_FULL_RANDOM";
pub const SEED_ENV: &str = "INDUS_XLIT_SEED";

/// Settings fixed for the lifetime of one sign table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Draw random symbols from the full phonetic alphabet and skip implicit
    /// vowels in the random rendering.
    pub full_random: bool,
    /// Seed for random symbol assignment; entropy when `None`.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Reads the mode switch and seed from the environment. Unparseable
    /// values fall back to the defaults.
    pub fn from_env() -> Self {
        let full_random = std::env::var(FULL_RANDOM_ENV)
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let seed = std::env::var(SEED_ENV).ok().and_then(|v| v.trim().parse().ok());
        Self { full_random, seed }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Decode the whole corpus, export records and frequencies.
    Translate,
    /// List signs without a phonetic value.
    Unknown,
    /// Decode a single inscription string.
    Decode(String),
}

/// File layout and switches for one run of the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub dataset_dir: PathBuf,
    pub results_dir: PathBuf,
    pub signs_file: String,
    pub inscriptions_file: String,
    pub translated_file: String,
    pub frequency_file: String,
    /// Load the sign table from here if it exists, and save it after building.
    pub snapshot: Option<PathBuf>,
    pub json: bool,
    pub engine: EngineConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("dataset"),
            results_dir: PathBuf::from("results"),
            signs_file: "xlits.csv".to_string(),
            inscriptions_file: "indus-inscriptions.csv".to_string(),
            translated_file: "indus-translated.csv".to_string(),
            frequency_file: "substring_unicode_frequency.csv".to_string(),
            snapshot: None,
            json: false,
            engine: EngineConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn signs_path(&self) -> PathBuf {
        self.dataset_dir.join(&self.signs_file)
    }

    pub fn inscriptions_path(&self) -> PathBuf {
        self.dataset_dir.join(&self.inscriptions_file)
    }

    pub fn translated_path(&self) -> PathBuf {
        self.results_dir.join(&self.translated_file)
    }

    pub fn frequency_path(&self) -> PathBuf {
        self.results_dir.join(&self.frequency_file)
    }

    /// Parses command-line arguments (program name already stripped) on top
    /// of `base`, usually the defaults with the environment applied.
    pub fn from_args(args: &[String], base: RunConfig) -> Result<(Command, RunConfig), String> {
        let mut config = base;
        let mut command = None;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--dataset" => config.dataset_dir = PathBuf::from(value(&mut iter, arg)?),
                "--results" => config.results_dir = PathBuf::from(value(&mut iter, arg)?),
                "--signs" => config.signs_file = value(&mut iter, arg)?,
                "--inscriptions" => config.inscriptions_file = value(&mut iter, arg)?,
                "--snapshot" => config.snapshot = Some(PathBuf::from(value(&mut iter, arg)?)),
                "--seed" => {
                    let raw = value(&mut iter, arg)?;
                    let seed = raw
                        .parse()
                        .map_err(|_| format!("--seed expects an integer, got '{raw}'"))?;
                    config.engine.seed = Some(seed);
                }
                "--full-random" => config.engine.full_random = true,
                "--json" => config.json = true,
                "translate" if command.is_none() => command = Some(Command::Translate),
                "unknown" if command.is_none() => command = Some(Command::Unknown),
                "decode" if command.is_none() => {
                    command = Some(Command::Decode(value(&mut iter, arg)?));
                }
                other => return Err(format!("unexpected argument '{other}'")),
            }
        }

        Ok((command.unwrap_or(Command::Translate), config))
    }
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<String, String> {
    iter.next()
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_translate() {
        let (cmd, config) = RunConfig::from_args(&[], RunConfig::default()).unwrap();
        assert_eq!(cmd, Command::Translate);
        assert_eq!(config.signs_path(), PathBuf::from("dataset/xlits.csv"));
        assert_eq!(
            config.frequency_path(),
            PathBuf::from("results/substring_unicode_frequency.csv")
        );
    }

    #[test]
    fn parses_flags_and_command() {
        let (cmd, config) = RunConfig::from_args(
            &args(&["decode", "1-2", "--full-random", "--seed", "7", "--dataset", "d"]),
            RunConfig::default(),
        )
        .unwrap();
        assert_eq!(cmd, Command::Decode("1-2".to_string()));
        assert!(config.engine.full_random);
        assert_eq!(config.engine.seed, Some(7));
        assert_eq!(config.dataset_dir, PathBuf::from("d"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(RunConfig::from_args(&args(&["--seed", "x"]), RunConfig::default()).is_err());
        assert!(RunConfig::from_args(&args(&["--dataset"]), RunConfig::default()).is_err());
        assert!(RunConfig::from_args(&args(&["bogus"]), RunConfig::default()).is_err());
    }
}
