//! Identifier universes: sector-organized ticker lists and plain lists.
//!
//! A `Universe` is stored as a TOML file mapping sector names to member
//! tickers; a `StaticUniverse` is a flat list (one identifier per line in its
//! file form, `#` starts a comment). Both implement `UniverseSource`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::provider::{DataError, UniverseSource};

/// Stock codes at or above this value on HKEX are not ordinary equities
/// (warrants, CBBCs, debt, ...).
pub const HK_EQUITY_CODE_LIMIT: u32 = 4800;

/// Format an HKEX stock code as a Yahoo ticker: `5` → `"0005.HK"`.
///
/// Returns `None` for codes outside the Main Board/GEM equity range.
pub fn hk_ticker(code: u32) -> Option<String> {
    (code > 0 && code < HK_EQUITY_CODE_LIMIT).then(|| format!("{code:04}.HK"))
}

/// Sector → tickers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Io(format!("read universe file {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        toml::from_str(content).map_err(|e| DataError::Parse(format!("parse universe TOML: {e}")))
    }

    /// All tickers across sectors, first occurrence wins, sector order.
    pub fn all_tickers(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.sectors
            .values()
            .flat_map(|tickers| tickers.iter().map(|t| t.as_str()))
            .filter(|t| seen.insert(*t))
            .collect()
    }

    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.keys().map(|s| s.as_str()).collect()
    }

    pub fn ticker_count(&self) -> usize {
        self.all_tickers().len()
    }

    /// Restrict to the named sectors. Unknown names are an error.
    pub fn select(&self, sectors: &[String]) -> Result<Self, DataError> {
        let mut selected = BTreeMap::new();
        for name in sectors {
            let tickers = self
                .sectors
                .get(name)
                .ok_or_else(|| DataError::Other(format!("unknown sector '{name}'")))?;
            selected.insert(name.clone(), tickers.clone());
        }
        Ok(Self { sectors: selected })
    }

    /// A small default watch list: Hang Seng heavyweights and US mega caps.
    pub fn default_watchlist() -> Self {
        let mut sectors = BTreeMap::new();
        sectors.insert(
            "HongKong".into(),
            [5, 388, 700, 857, 386, 267, 836, 1299]
                .into_iter()
                .filter_map(hk_ticker)
                .collect(),
        );
        sectors.insert(
            "US".into(),
            ["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "JPM", "XOM"]
                .into_iter()
                .map(String::from)
                .collect(),
        );
        Self { sectors }
    }
}

impl UniverseSource for Universe {
    fn name(&self) -> &str {
        "universe_toml"
    }

    fn identifiers(&self) -> Result<Vec<String>, DataError> {
        Ok(self.all_tickers().into_iter().map(String::from).collect())
    }
}

/// Fixed identifier list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticUniverse {
    identifiers: Vec<String>,
}

impl StaticUniverse {
    pub fn new(identifiers: Vec<String>) -> Self {
        Self { identifiers }
    }

    /// One identifier per line; blank lines and `#` comments are ignored.
    pub fn from_lines(content: &str) -> Self {
        let identifiers = content
            .lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { identifiers }
    }

    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Io(format!("read identifier list {}: {e}", path.display())))?;
        Ok(Self::from_lines(&content))
    }

    /// HKEX stock codes as Yahoo tickers. Non-equity codes are skipped.
    pub fn from_hk_codes(codes: &[u32]) -> Self {
        let identifiers = codes
            .iter()
            .filter_map(|&code| {
                let ticker = hk_ticker(code);
                if ticker.is_none() {
                    tracing::warn!(code, "skipping non-equity HKEX code");
                }
                ticker
            })
            .collect();
        Self { identifiers }
    }
}

impl UniverseSource for StaticUniverse {
    fn name(&self) -> &str {
        "static"
    }

    fn identifiers(&self) -> Result<Vec<String>, DataError> {
        Ok(self.identifiers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hk_codes_are_zero_padded() {
        assert_eq!(hk_ticker(5).as_deref(), Some("0005.HK"));
        assert_eq!(hk_ticker(9988), None);
        assert_eq!(hk_ticker(4799).as_deref(), Some("4799.HK"));
        assert_eq!(hk_ticker(0), None);
    }

    #[test]
    fn default_watchlist_uses_padded_hk_tickers() {
        let u = Universe::default_watchlist();
        assert_eq!(u.sector_names(), ["HongKong", "US"]);
        assert_eq!(u.ticker_count(), 16);
        assert!(u.all_tickers().contains(&"0005.HK"));
        assert!(u.all_tickers().contains(&"0700.HK"));
    }

    #[test]
    fn hk_code_list_skips_non_equity_codes() {
        let u = StaticUniverse::from_hk_codes(&[5, 0, 700, 4800, 9988, 1299]);
        assert_eq!(
            u.identifiers().unwrap(),
            ["0005.HK", "0700.HK", "1299.HK"]
        );
    }

    #[test]
    fn all_tickers_dedupes_across_sectors() {
        let u = Universe::from_toml(
            r#"[sectors]
Tech = ["AAPL", "MSFT"]
Dow = ["MSFT", "JPM"]
"#,
        )
        .unwrap();
        // BTreeMap order: Dow before Tech
        assert_eq!(u.all_tickers(), vec!["MSFT", "JPM", "AAPL"]);
        assert_eq!(u.identifiers().unwrap().len(), 3);
    }

    #[test]
    fn select_sectors() {
        let u = Universe::default_watchlist();
        let hk = u.select(&["HongKong".to_string()]).unwrap();
        assert_eq!(hk.sector_names(), vec!["HongKong"]);
        assert!(u.select(&["Mars".to_string()]).is_err());
    }

    #[test]
    fn static_universe_from_lines() {
        let u = StaticUniverse::from_lines("AAPL\n# comment\n\n0005.HK  # HSBC\n");
        assert_eq!(
            u.identifiers().unwrap(),
            vec!["AAPL".to_string(), "0005.HK".to_string()]
        );
    }
}
