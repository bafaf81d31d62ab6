//! Ticker normalization for the provider and for output file names.

/// Leading character that marks a market index (e.g. `^TWII`).
pub const INDEX_MARKER: char = '^';

/// Suffix that addresses local-market equities at the provider.
pub const MARKET_SUFFIX: &str = ".TW";

/// How bare tickers map onto provider symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketConvention {
    pub index_marker: char,
    pub suffix: &'static str,
}

impl Default for MarketConvention {
    fn default() -> Self {
        Self {
            index_marker: INDEX_MARKER,
            suffix: MARKET_SUFFIX,
        }
    }
}

impl MarketConvention {
    pub fn is_index(&self, symbol: &str) -> bool {
        symbol.starts_with(self.index_marker)
    }

    /// Provider form of `symbol`. Indices and already-suffixed tickers pass
    /// through; everything else gets the suffix once.
    pub fn normalize(&self, symbol: &str) -> String {
        if self.is_index(symbol) || symbol.ends_with(self.suffix) {
            symbol.to_string()
        } else {
            format!("{symbol}{}", self.suffix)
        }
    }

    /// File-name stem for `symbol`: the suffix is stripped once.
    pub fn file_stem<'a>(&self, symbol: &'a str) -> &'a str {
        symbol.strip_suffix(self.suffix).unwrap_or(symbol)
    }
}

pub fn normalize(symbol: &str) -> String {
    MarketConvention::default().normalize(symbol)
}

pub fn canonical_file_stem(symbol: &str) -> &str {
    MarketConvention::default().file_stem(symbol)
}
