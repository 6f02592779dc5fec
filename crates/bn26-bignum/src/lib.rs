#![doc = "Arbitrary-precision integer arithmetic over 26-bit limbs."]
#![forbid(unsafe_code)]

mod bignum;
mod bits;
mod ct;
mod div;
mod fft;
mod format;
mod gcd;
mod mul;
mod ops;
mod parse;
#[cfg(feature = "rand")]
mod rand;
mod red;

pub use bignum::{BigNum, DoubleLimb, Limb, LIMB_BITS, LIMB_MASK};
pub use bn26_types::{BnError, Endian};
pub use div::{DivMode, DivModResult};
pub use gcd::Egcd;
pub use mul::{MulStrategy, FFT_MUL_THRESHOLD};
pub use red::{PrimeParams, ReductionContext, ReductionStrategy};
