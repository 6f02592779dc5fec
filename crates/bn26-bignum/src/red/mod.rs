//! Reduction contexts for repeated modular arithmetic.
//!
//! A [`ReductionContext`] fixes a modulus and a reduction method. Values are
//! moved into a context with [`BigNum::to_red`], combined with the `red_*`
//! methods and moved back out with [`BigNum::from_red`].

mod mont;
mod mprime;

use std::sync::Arc;

use bn26_types::BnError;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::bignum::BigNum;
use mont::Montgomery;

pub use mprime::{PrimeParams, ReductionStrategy};

#[derive(Debug)]
enum Reducer {
    /// Full division by the modulus.
    Plain,
    /// Split-and-fold reduction for a named pseudo-Mersenne prime.
    Prime(Box<dyn ReductionStrategy>),
    /// Values held in Montgomery form.
    Mont(Montgomery),
}

/// A modulus together with the method used to reduce modulo it.
///
/// Contexts are immutable and shared through `Arc`; values carrying the
/// same `Arc` can be combined.
#[derive(Debug)]
pub struct ReductionContext {
    modulus: BigNum,
    reducer: Reducer,
}

static K256: OnceCell<Arc<ReductionContext>> = OnceCell::new();
static P224: OnceCell<Arc<ReductionContext>> = OnceCell::new();
static P192: OnceCell<Arc<ReductionContext>> = OnceCell::new();
static P25519: OnceCell<Arc<ReductionContext>> = OnceCell::new();

impl ReductionContext {
    /// Context reducing by plain division. The modulus must be greater than one.
    pub fn new(modulus: &BigNum) -> Result<Arc<Self>, BnError> {
        if !modulus.gtn(1) {
            return Err(BnError::InvalidModulus);
        }
        debug!(kind = "plain", bits = modulus.bit_len(), "reduction context");
        Ok(Arc::new(Self {
            modulus: modulus.clone_plain(),
            reducer: Reducer::Plain,
        }))
    }

    /// Montgomery context. The modulus must be odd and greater than one.
    pub fn mont(modulus: &BigNum) -> Result<Arc<Self>, BnError> {
        if !modulus.gtn(1) || modulus.is_even() {
            return Err(BnError::InvalidModulus);
        }
        let mont = Montgomery::new(modulus)?;
        debug!(kind = "mont", bits = modulus.bit_len(), "reduction context");
        Ok(Arc::new(Self {
            modulus: modulus.clone_plain(),
            reducer: Reducer::Mont(mont),
        }))
    }

    /// Shared context for a named prime: `k256`, `p224`, `p192` or `p25519`.
    ///
    /// Each context is built on first use and reused afterwards.
    pub fn prime(name: &str) -> Result<Arc<Self>, BnError> {
        let cell = match name {
            "k256" => &K256,
            "p224" => &P224,
            "p192" => &P192,
            "p25519" => &P25519,
            _ => return Err(BnError::UnknownPrime(name.to_string())),
        };
        cell.get_or_try_init(|| {
            let strategy = mprime::named(name)?;
            let modulus = strategy.params().p.clone();
            debug!(kind = "prime", name, bits = modulus.bit_len(), "reduction context");
            Ok(Arc::new(Self {
                modulus,
                reducer: Reducer::Prime(strategy),
            }))
        })
        .cloned()
    }

    /// The modulus.
    pub fn modulus(&self) -> &BigNum {
        &self.modulus
    }

    /// Name of the prime for named contexts.
    pub fn prime_name(&self) -> Option<&'static str> {
        match &self.reducer {
            Reducer::Prime(s) => Some(s.params().name),
            _ => None,
        }
    }

    /// True if values are held in Montgomery form.
    pub fn is_mont(&self) -> bool {
        matches!(self.reducer, Reducer::Mont(_))
    }

    /// Reduce any value into `[0, m)`.
    fn imod(&self, mut a: BigNum) -> BigNum {
        match &self.reducer {
            Reducer::Prime(strategy) if !a.is_negative() => {
                strategy.ireduce(&mut a);
                a
            }
            _ => a.umod_nonzero(&self.modulus),
        }
    }

    fn convert_to(&self, a: &BigNum) -> BigNum {
        match &self.reducer {
            Reducer::Mont(mont) => mont.to_mont(a),
            _ => self.imod(a.clone_plain()),
        }
    }

    fn convert_from(&self, a: &BigNum) -> BigNum {
        match &self.reducer {
            Reducer::Mont(mont) => mont.from_mont(a),
            _ => a.clone_plain(),
        }
    }

    fn one(&self) -> BigNum {
        self.convert_to(&BigNum::one())
    }

    fn add(&self, a: &BigNum, b: &BigNum) -> BigNum {
        a.add(b).ct_sub_if_gte(&self.modulus)
    }

    fn sub(&self, a: &BigNum, b: &BigNum) -> BigNum {
        let mut r = a.sub(b);
        if r.is_negative() {
            r.iadd(&self.modulus);
        }
        r
    }

    fn neg(&self, a: &BigNum) -> BigNum {
        if a.is_zero() {
            return BigNum::zero();
        }
        self.modulus.sub(a)
    }

    fn shl(&self, a: &BigNum, bits: usize) -> BigNum {
        self.imod(a.ushln(bits))
    }

    fn mul(&self, a: &BigNum, b: &BigNum) -> BigNum {
        match &self.reducer {
            Reducer::Mont(mont) => mont.mul(a, b),
            _ => self.imod(a.mul(b)),
        }
    }

    fn sqr(&self, a: &BigNum) -> BigNum {
        match &self.reducer {
            Reducer::Mont(mont) => mont.sqr(a),
            _ => self.imod(a.sqr()),
        }
    }

    fn invm(&self, a: &BigNum) -> Result<BigNum, BnError> {
        match &self.reducer {
            Reducer::Mont(mont) => mont.invm(a),
            _ if self.modulus.is_odd() => a.invmp(&self.modulus),
            _ => a.invm(&self.modulus),
        }
    }

    /// Windowed exponentiation in the context's representation.
    fn pow(&self, base: &BigNum, exp: &BigNum) -> BigNum {
        if exp.is_zero() {
            return self.one();
        }

        let exp_bits = exp.bit_len();
        let w = get_window_size(exp_bits);
        let table_size = 1usize << w;

        // table[i] = base^i
        let mut table = Vec::with_capacity(table_size);
        table.push(self.one());
        table.push(base.clone_plain());
        for i in 2..table_size {
            let val = self.mul(&table[i - 1], base);
            table.push(val);
        }

        let mut result = table[0].clone();
        let mut i = exp_bits;
        while i > 0 {
            let window_bits = w.min(i);
            i -= window_bits;

            for _ in 0..window_bits {
                result = self.sqr(&result);
            }

            let mut window_val = 0usize;
            for b in 0..window_bits {
                window_val |= (exp.testn(i + b) as usize) << b;
            }
            if window_val != 0 {
                result = self.mul(&result, &table[window_val]);
            }
        }
        result
    }

    /// Square root in the context's representation.
    fn sqrt(&self, a: &BigNum) -> Result<BigNum, BnError> {
        if a.is_zero() {
            return Ok(BigNum::zero());
        }
        let mod4 = self.modulus.andln(3);
        if mod4 & 1 == 0 {
            return Err(BnError::InvalidModulus);
        }

        let root = if mod4 == 3 {
            let mut exp = self.modulus.addn(1);
            exp.iushrn(2);
            self.pow(a, &exp)
        } else {
            self.tonelli_shanks(a)?
        };

        if self.sqr(&root) != *a {
            return Err(BnError::NoSquareRoot);
        }
        Ok(root)
    }

    fn tonelli_shanks(&self, a: &BigNum) -> Result<BigNum, BnError> {
        let one = self.one();
        let n_one = self.neg(&one);

        // m - 1 = q * 2^s with q odd
        let mut q = self.modulus.subn(1);
        let s = q.zero_bits();
        q.iushrn(s);

        // Euler's criterion: a^((m-1)/2) == 1 for a residue modulo a prime
        let lpow = self.modulus.subn(1).ushrn(1);
        if self.pow(a, &lpow) != one {
            return Err(BnError::NoSquareRoot);
        }

        // Find a quadratic non-residue z. For a prime modulus one lies below
        // 2 * bits^2; finding none means the modulus is not prime.
        let bits = self.modulus.bit_len() as u64;
        let limit = BigNum::from_u64(2 * bits * bits + 2).min(self.modulus.clone_plain());
        let mut candidate = BigNum::from_u64(2);
        let mut z = self.convert_to(&candidate);
        while self.pow(&z, &lpow) != n_one {
            candidate.iaddn(1);
            if candidate >= limit {
                return Err(BnError::InvalidModulus);
            }
            z = self.add(&z, &one);
        }

        let mut c = self.pow(&z, &q);
        let mut r = self.pow(a, &q.addn(1).ushrn(1));
        let mut t = self.pow(a, &q);
        let mut m = s;

        while t != one {
            let mut tmp = t.clone();
            let mut i = 0;
            while tmp != one {
                if i + 1 >= m {
                    return Err(BnError::NoSquareRoot);
                }
                tmp = self.sqr(&tmp);
                i += 1;
            }
            let b = self.pow(&c, &BigNum::one().ushln(m - i - 1));
            r = self.mul(&r, &b);
            c = self.sqr(&b);
            t = self.mul(&t, &c);
            m = i;
        }
        Ok(r)
    }
}

/// Determine window size for exponentiation based on exponent bit length.
fn get_window_size(bits: usize) -> usize {
    if bits > 512 {
        6
    } else if bits > 256 {
        5
    } else if bits > 128 {
        4
    } else if bits > 64 {
        3
    } else if bits > 32 {
        2
    } else {
        1
    }
}

impl BigNum {
    /// Convert into `ctx`. Negative values are reduced into `[0, m)`.
    pub fn to_red(&self, ctx: &Arc<ReductionContext>) -> Result<BigNum, BnError> {
        if self.red.is_some() {
            return Err(BnError::AlreadyInRedContext);
        }
        Ok(ctx.convert_to(self).attach(ctx))
    }

    /// Attach `ctx` without converting. The value must already be in the
    /// context's representation.
    pub fn force_red(&mut self, ctx: &Arc<ReductionContext>) -> Result<&mut Self, BnError> {
        if self.red.is_some() {
            return Err(BnError::AlreadyInRedContext);
        }
        self.red = Some(Arc::clone(ctx));
        Ok(self)
    }

    /// Convert out of the value's context.
    pub fn from_red(&self) -> Result<BigNum, BnError> {
        let ctx = self.red.as_ref().ok_or(BnError::NotInRedContext)?;
        Ok(ctx.convert_from(self))
    }

    /// The context this value lives in, if any.
    pub fn red_context(&self) -> Option<&Arc<ReductionContext>> {
        self.red.as_ref()
    }

    fn attach(mut self, ctx: &Arc<ReductionContext>) -> BigNum {
        self.red = Some(Arc::clone(ctx));
        self
    }

    /// Context of a unary operand.
    fn red_unary(&self) -> Result<Arc<ReductionContext>, BnError> {
        let ctx = self.red.as_ref().ok_or(BnError::NotInRedContext)?;
        if self.negative {
            return Err(BnError::NegativeOperand);
        }
        Ok(Arc::clone(ctx))
    }

    /// Shared context of a binary operation.
    fn red_binary(&self, num: &BigNum) -> Result<Arc<ReductionContext>, BnError> {
        let ctx = self.red_unary()?;
        let other = num.red_unary()?;
        if !Arc::ptr_eq(&ctx, &other) {
            return Err(BnError::RedContextMismatch);
        }
        Ok(ctx)
    }

    /// Modular addition.
    pub fn red_add(&self, num: &BigNum) -> Result<BigNum, BnError> {
        let ctx = self.red_binary(num)?;
        Ok(ctx.add(self, num).attach(&ctx))
    }

    /// Modular addition in place.
    pub fn red_iadd(&mut self, num: &BigNum) -> Result<&mut Self, BnError> {
        *self = self.red_add(num)?;
        Ok(self)
    }

    /// Modular subtraction.
    pub fn red_sub(&self, num: &BigNum) -> Result<BigNum, BnError> {
        let ctx = self.red_binary(num)?;
        Ok(ctx.sub(self, num).attach(&ctx))
    }

    /// Modular subtraction in place.
    pub fn red_isub(&mut self, num: &BigNum) -> Result<&mut Self, BnError> {
        *self = self.red_sub(num)?;
        Ok(self)
    }

    /// Shift left by `bits` and reduce.
    pub fn red_shl(&self, bits: usize) -> Result<BigNum, BnError> {
        let ctx = self.red_unary()?;
        Ok(ctx.shl(self, bits).attach(&ctx))
    }

    /// Modular multiplication.
    pub fn red_mul(&self, num: &BigNum) -> Result<BigNum, BnError> {
        let ctx = self.red_binary(num)?;
        Ok(ctx.mul(self, num).attach(&ctx))
    }

    /// Modular multiplication in place.
    pub fn red_imul(&mut self, num: &BigNum) -> Result<&mut Self, BnError> {
        *self = self.red_mul(num)?;
        Ok(self)
    }

    /// Modular squaring.
    pub fn red_sqr(&self) -> Result<BigNum, BnError> {
        let ctx = self.red_unary()?;
        Ok(ctx.sqr(self).attach(&ctx))
    }

    /// Modular squaring in place.
    pub fn red_isqr(&mut self) -> Result<&mut Self, BnError> {
        *self = self.red_sqr()?;
        Ok(self)
    }

    /// Modular square root. Fails with `NoSquareRoot` for non-residues.
    pub fn red_sqrt(&self) -> Result<BigNum, BnError> {
        let ctx = self.red_unary()?;
        Ok(ctx.sqrt(self)?.attach(&ctx))
    }

    /// Modular inverse. Fails with `NoInverse` when none exists.
    pub fn red_invm(&self) -> Result<BigNum, BnError> {
        let ctx = self.red_unary()?;
        Ok(ctx.invm(self)?.attach(&ctx))
    }

    /// Modular negation; zero maps to zero.
    pub fn red_neg(&self) -> Result<BigNum, BnError> {
        let ctx = self.red_unary()?;
        Ok(ctx.neg(self).attach(&ctx))
    }

    /// Raise to a plain, non-negative exponent.
    pub fn red_pow(&self, exp: &BigNum) -> Result<BigNum, BnError> {
        let ctx = self.red_unary()?;
        if exp.red.is_some() {
            return Err(BnError::AlreadyInRedContext);
        }
        if exp.negative {
            return Err(BnError::NegativeExponent);
        }
        Ok(ctx.pow(self, exp).attach(&ctx))
    }
}
