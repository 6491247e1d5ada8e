use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Every news source the engine has an adapter for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSource {
    Kompas,
    Detik,
    Tribun,
}

impl NewsSource {
    pub const ALL: [NewsSource; 3] = [NewsSource::Kompas, NewsSource::Detik, NewsSource::Tribun];

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsSource::Kompas => "kompas",
            NewsSource::Detik => "detik",
            NewsSource::Tribun => "tribun",
        }
    }
}

impl fmt::Display for NewsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        NewsSource::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnsupportedSource(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!("kompas".parse::<NewsSource>().unwrap(), NewsSource::Kompas);
        assert_eq!("Detik".parse::<NewsSource>().unwrap(), NewsSource::Detik);
        assert_eq!(" TRIBUN ".parse::<NewsSource>().unwrap(), NewsSource::Tribun);
    }

    #[test]
    fn test_parse_unknown_source() {
        let err = "unknown-source".parse::<NewsSource>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource(s) if s == "unknown-source"));
    }

    #[test]
    fn test_serde_identifier() {
        assert_eq!(serde_json::to_string(&NewsSource::Tribun).unwrap(), "\"tribun\"");
        let parsed: NewsSource = serde_json::from_str("\"detik\"").unwrap();
        assert_eq!(parsed, NewsSource::Detik);
    }
}
