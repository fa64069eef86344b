//! The multiply bridge.

use log::trace;

/// Returns the IEEE-754 product of `a` and `b`.
#[inline]
pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Multiply as seen from a foreign caller. Every entry point goes through here.
pub(crate) fn bridge_multiply(entry_point: &'static str, a: f64, b: f64) -> f64 {
    let product = multiply(a, b);
    trace!("{entry_point}({a}, {b}) = {product}");
    product
}

/// Multiplies two doubles for C callers.
///
/// Total over every `double` input: NaN and infinities follow IEEE-754 rules and
/// no error is ever reported.
#[unsafe(no_mangle)]
pub extern "C" fn rnlocalp2p_multiply(a: f64, b: f64) -> f64 {
    bridge_multiply("rnlocalp2p_multiply", a, b)
}
