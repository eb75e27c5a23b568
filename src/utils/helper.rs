/// Settlement suffix of unified USDT-margined perpetual symbols.
pub const USDT_PERP_SUFFIX: &str = "/USDT:USDT";

/// `BTC/USDT:USDT` -> `BTC`; other symbols are returned unchanged.
pub fn display_symbol(symbol: &str) -> &str {
    symbol.strip_suffix(USDT_PERP_SUFFIX).unwrap_or(symbol)
}
