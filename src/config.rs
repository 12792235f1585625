// Command line options and the validated game configuration

use std::str::FromStr;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

const MIN_WINDOW_SIZE: u32 = 200;
const MAX_WINDOW_SIZE: u32 = 8192;

/// How the scene reaches the screen
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Frontend {
    /// Projected in software and painted as 2D polygons and lines
    Canvas,
    /// Uploaded as 3D triangles and drawn with a depth buffer
    Mesh,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "flight-club", version, about = "Cross-country hang gliding")]
pub struct Args {
    /// Renderer front-end
    #[arg(long, value_enum, default_value_t = Frontend::Canvas)]
    pub frontend: Frontend,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Start the demo at five times normal speed
    #[arg(long)]
    pub fast_forward: bool,

    /// Seed for a repeatable sky
    #[arg(long)]
    pub seed: Option<u64>,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("window size {0}x{1} is outside 200..=8192")]
    WindowSize(u32, u32),

    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

/// Settings the application starts from
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub frontend: Frontend,
    pub width: u32,
    pub height: u32,
    pub fast_forward: bool,
    pub seed: Option<u64>,
    pub log_level: log::LevelFilter,
}

impl GameConfig {
    /// Seeded when asked for, otherwise from entropy
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frontend: Frontend::Canvas,
            width: 1000,
            height: 600,
            fast_forward: false,
            seed: None,
            log_level: log::LevelFilter::Info,
        }
    }
}

impl TryFrom<Args> for GameConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let size_ok = |s: u32| (MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(&s);
        if !size_ok(args.width) || !size_ok(args.height) {
            return Err(ConfigError::WindowSize(args.width, args.height));
        }

        let log_level = log::LevelFilter::from_str(&args.log_level)
            .map_err(|_| ConfigError::LogLevel(args.log_level.clone()))?;

        Ok(Self {
            frontend: args.frontend,
            width: args.width,
            height: args.height,
            fast_forward: args.fast_forward,
            seed: args.seed,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn parse(args: &[&str]) -> Result<GameConfig, ConfigError> {
        let args = Args::try_parse_from(std::iter::once("flight-club").chain(args.iter().copied()))
            .expect("arguments should parse");
        GameConfig::try_from(args)
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse(&[]), Ok(GameConfig::default()));
    }

    #[test]
    fn test_options() {
        let config = parse(&[
            "--frontend",
            "mesh",
            "--width",
            "800",
            "--fast-forward",
            "--seed",
            "42",
            "--log-level",
            "debug",
        ])
        .expect("valid config");
        assert_eq!(config.frontend, Frontend::Mesh);
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert!(config.fast_forward);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn test_bad_window_size() {
        assert_eq!(
            parse(&["--height", "50"]),
            Err(ConfigError::WindowSize(1000, 50))
        );
    }

    #[test]
    fn test_bad_log_level() {
        assert_eq!(
            parse(&["--log-level", "loud"]),
            Err(ConfigError::LogLevel("loud".to_string()))
        );
    }

    #[test]
    fn test_seeded_rng_repeats() {
        let config = parse(&["--seed", "7"]).expect("valid config");
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_frontend_rejected() {
        assert!(Args::try_parse_from(["flight-club", "--frontend", "vulkan"]).is_err());
    }
}
