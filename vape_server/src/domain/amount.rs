use alloy::primitives::U256;

// Native currency and the gating token both use 18 decimals.
pub const DECIMALS: u8 = 18;

/// Formats a fixed-point integer as a decimal string.
///
/// Trailing fractional zeros are trimmed and whole amounts carry no decimal
/// point, so `1500000000000000000` renders as `1.5` and `10^18` as `1`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let (whole, fraction) = value.div_rem(scale);
    if fraction.is_zero() {
        return whole.to_string();
    }

    let padded = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{whole}.{}", padded.trim_end_matches('0'))
}

pub fn format_ether(value: U256) -> String {
    format_units(value, DECIMALS)
}

// Display string used by every ETH-denominated stat.
pub fn eth_display(value: U256) -> String {
    format!("{} ETH", format_ether(value))
}

/// Whole token units scaled to the 18-decimal base unit.
pub fn token_units(units: u64) -> U256 {
    U256::from(units) * U256::from(10u64).pow(U256::from(DECIMALS))
}
