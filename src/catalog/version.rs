use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Structured game version. `0.0.0.0` stands for an unknown version.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GameVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl GameVersion {
    pub const UNKNOWN: GameVersion = GameVersion {
        major: 0,
        minor: 0,
        build: 0,
        revision: 0,
    };

    /// Parses "1.13.3.9" and "1.13.3-f9". A missing revision counts as zero;
    /// anything else unparseable becomes [`GameVersion::UNKNOWN`].
    pub fn parse(text: &str) -> GameVersion {
        let parts: Vec<&str> = text
            .trim()
            .split(['.', '-', 'f'])
            .filter(|part| !part.is_empty())
            .collect();
        if !(3..=4).contains(&parts.len()) {
            debug!("Unrecognized game version: {:?}", text);
            return GameVersion::UNKNOWN;
        }
        let numbers: Result<Vec<u32>, _> = parts.iter().map(|p| p.parse::<u32>()).collect();
        match numbers {
            Ok(numbers) => GameVersion {
                major: numbers[0],
                minor: numbers[1],
                build: numbers[2],
                revision: numbers.get(3).copied().unwrap_or(0),
            },
            Err(_) => {
                debug!("Unrecognized game version: {:?}", text);
                GameVersion::UNKNOWN
            }
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == GameVersion::UNKNOWN
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_and_patch_notation() {
        let expected = GameVersion {
            major: 1,
            minor: 13,
            build: 3,
            revision: 9,
        };
        assert_eq!(GameVersion::parse("1.13.3.9"), expected);
        assert_eq!(GameVersion::parse("1.13.3-f9"), expected);
        assert_eq!(GameVersion::parse("1.17.1").to_string(), "1.17.1.0");
    }

    #[test]
    fn garbage_becomes_unknown() {
        assert!(GameVersion::parse("").is_unknown());
        assert!(GameVersion::parse("latest").is_unknown());
        assert!(GameVersion::parse("1.x.3.4").is_unknown());
        assert_eq!(GameVersion::parse("nope").to_string(), "0.0.0.0");
    }
}
