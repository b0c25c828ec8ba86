use thiserror::Error;

/// Symbols reported every morning, grouped the way they appear in the message.
/// Edit this table to change what gets posted.
const STANDARD: &[(&str, &str, &[(&str, &str)])] = &[
    ("Japan", "🇯🇵", &[("^N225", "Nikkei 225"), ("1306.T", "TOPIX")]),
    (
        "US (previous session)",
        "🇺🇸",
        &[
            ("^GSPC", "S&P 500"),
            ("^IXIC", "NASDAQ"),
            ("^DJI", "Dow Jones"),
        ],
    ),
    ("FX", "💱", &[("USDJPY=X", "USD/JPY")]),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatchlistError {
    #[error("watchlist has no symbols")]
    Empty,

    #[error("blank symbol for {0:?}")]
    BlankSymbol(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub emoji: String,
    pub entries: Vec<Entry>,
}

/// Immutable, ordered symbol -> display name mapping.
#[derive(Debug, Clone)]
pub struct Watchlist {
    sections: Vec<Section>,
}

impl Watchlist {
    pub fn new(mut sections: Vec<Section>) -> Result<Self, WatchlistError> {
        for section in &mut sections {
            for entry in &mut section.entries {
                entry.symbol = Self::normalize(&entry.symbol);
                if entry.symbol.is_empty() {
                    return Err(WatchlistError::BlankSymbol(entry.name.clone()));
                }
            }
        }

        sections.retain(|s| !s.entries.is_empty());
        if sections.is_empty() {
            return Err(WatchlistError::Empty);
        }

        Ok(Self { sections })
    }

    /// The compiled-in watchlist.
    pub fn standard() -> Result<Self, WatchlistError> {
        let sections = STANDARD
            .iter()
            .map(|(title, emoji, entries)| Section {
                title: title.to_string(),
                emoji: emoji.to_string(),
                entries: entries
                    .iter()
                    .map(|(symbol, name)| Entry {
                        symbol: symbol.to_string(),
                        name: name.to_string(),
                    })
                    .collect(),
            })
            .collect();

        Self::new(sections)
    }

    fn normalize(symbol: &str) -> String {
        symbol.trim().to_uppercase()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }

    /// Total number of symbols
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
