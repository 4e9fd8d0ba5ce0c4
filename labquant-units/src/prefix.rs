//! SI prefix table (yocto..yotta)

use std::fmt;

/// A power-of-ten scale applied to a unit symbol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiPrefix {
    pub symbol: &'static str,
    pub name: &'static str,
    pub multiplier: f64,
}

impl SiPrefix {
    /// The distinguished "no prefix" value
    pub const NONE: SiPrefix = SiPrefix { symbol: "", name: "", multiplier: 1.0 };

    pub fn is_none(&self) -> bool {
        self.symbol.is_empty()
    }

    /// Look up a prefix by its symbol. `"u"` and the micro signs all map to micro.
    pub fn lookup(symbol: &str) -> Option<SiPrefix> {
        if symbol.is_empty() {
            return Some(SiPrefix::NONE);
        }
        let symbol = match symbol {
            "\u{00B5}" | "\u{03BC}" => "u",
            s => s,
        };
        PREFIXES.iter().find(|p| p.symbol == symbol).copied()
    }
}

impl Default for SiPrefix {
    fn default() -> Self {
        SiPrefix::NONE
    }
}

impl fmt::Display for SiPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

pub static PREFIXES: [SiPrefix; 20] = [
    SiPrefix { symbol: "y", name: "yocto", multiplier: 1e-24 },
    SiPrefix { symbol: "z", name: "zepto", multiplier: 1e-21 },
    SiPrefix { symbol: "a", name: "atto", multiplier: 1e-18 },
    SiPrefix { symbol: "f", name: "femto", multiplier: 1e-15 },
    SiPrefix { symbol: "p", name: "pico", multiplier: 1e-12 },
    SiPrefix { symbol: "n", name: "nano", multiplier: 1e-9 },
    SiPrefix { symbol: "u", name: "micro", multiplier: 1e-6 },
    SiPrefix { symbol: "m", name: "milli", multiplier: 1e-3 },
    SiPrefix { symbol: "c", name: "centi", multiplier: 1e-2 },
    SiPrefix { symbol: "d", name: "deci", multiplier: 1e-1 },
    SiPrefix { symbol: "da", name: "deca", multiplier: 1e1 },
    SiPrefix { symbol: "h", name: "hecto", multiplier: 1e2 },
    SiPrefix { symbol: "k", name: "kilo", multiplier: 1e3 },
    SiPrefix { symbol: "M", name: "mega", multiplier: 1e6 },
    SiPrefix { symbol: "G", name: "giga", multiplier: 1e9 },
    SiPrefix { symbol: "T", name: "tera", multiplier: 1e12 },
    SiPrefix { symbol: "P", name: "peta", multiplier: 1e15 },
    SiPrefix { symbol: "E", name: "exa", multiplier: 1e18 },
    SiPrefix { symbol: "Z", name: "zetta", multiplier: 1e21 },
    SiPrefix { symbol: "Y", name: "yotta", multiplier: 1e24 },
];
