//! In-place multi-precision arithmetic on slices of 64-bit limbs.
//!
//! Buffers are little-endian: `limbs[0]` is the least significant word.
//! Every kernel here is the width-agnostic engine shared by `FixedInt<S>`
//! and `BignumArb` — neither type implements its own carry chains, they
//! both just slice into these functions.
//!
//! Unless documented otherwise, output buffers must not alias any input
//! buffer: callers that need aliasing copy into a scratch buffer first
//! (this is the "copy to a stack/scratch buffer" pattern the original
//! `fastMul` used, generalised here to a single caller-owned scratch).

use std::cmp::Ordering;

/// Lexicographic comparison, most-significant limb first.
///
/// `a` and `b` may have different lengths; the shorter buffer is treated
/// as zero-extended.
pub fn cmp(a: &[u64], b: &[u64]) -> Ordering {
    let n = a.len().max(b.len());
    for i in (0..n).rev() {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        match av.cmp(&bv) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Index one past the highest non-zero limb (0 if the value is zero).
pub fn real_size(a: &[u64]) -> usize {
    for i in (0..a.len()).rev() {
        if a[i] != 0 {
            return i + 1;
        }
    }
    0
}

/// Position of the highest set bit plus one (0 for a zero value), i.e.
/// `floor(log2(a)) + 1`.
pub fn bit_length(a: &[u64]) -> u32 {
    let rs = real_size(a);
    if rs == 0 {
        0
    } else {
        (rs as u32 - 1) * 64 + (64 - a[rs - 1].leading_zeros())
    }
}

/// `r <- a + b`, returning the carry out of the top limb.
///
/// `r.len()` must equal `max(a.len(), b.len())`; the carry is not folded
/// into `r`, matching fixed-width "caller guarantees no overflow" semantics.
pub fn add(r: &mut [u64], a: &[u64], b: &[u64]) -> u64 {
    debug_assert_eq!(r.len(), a.len().max(b.len()));
    let mut carry: u128 = 0;
    for i in 0..r.len() {
        let av = a.get(i).copied().unwrap_or(0) as u128;
        let bv = b.get(i).copied().unwrap_or(0) as u128;
        let sum = av + bv + carry;
        r[i] = sum as u64;
        carry = sum >> 64;
    }
    carry as u64
}

/// `r <- |a - b|`, returning `true` when `a < b` (i.e. `r` holds `b - a`).
pub fn sub(r: &mut [u64], a: &[u64], b: &[u64]) -> bool {
    let negative = cmp(a, b) == Ordering::Less;
    let (hi, lo) = if negative { (b, a) } else { (a, b) };
    debug_assert_eq!(r.len(), hi.len().max(lo.len()));
    let mut borrow: i128 = 0;
    for i in 0..r.len() {
        let hv = hi.get(i).copied().unwrap_or(0) as i128;
        let lv = lo.get(i).copied().unwrap_or(0) as i128;
        let mut diff = hv - lv - borrow;
        if diff < 0 {
            diff += 1i128 << 64;
            borrow = 1;
        } else {
            borrow = 0;
        }
        r[i] = diff as u64;
    }
    negative
}

/// Schoolbook multiplication using a 64x64->128 primitive.
///
/// `r.len()` must equal `a.len() + b.len()`. `r` must not alias `a` or `b`.
pub fn mul(r: &mut [u64], a: &[u64], b: &[u64]) {
    debug_assert_eq!(r.len(), a.len() + b.len());
    r.fill(0);
    for (i, &av) in a.iter().enumerate() {
        if av == 0 {
            continue;
        }
        let mut carry: u128 = 0;
        for (j, &bv) in b.iter().enumerate() {
            let acc = r[i + j] as u128 + (av as u128) * (bv as u128) + carry;
            r[i + j] = acc as u64;
            carry = acc >> 64;
        }
        let mut k = i + b.len();
        while carry != 0 {
            let acc = r[k] as u128 + carry;
            r[k] = acc as u64;
            carry = acc >> 64;
            k += 1;
        }
    }
}

/// Schoolbook squaring: halves the cross-product count by doubling the
/// off-diagonal partial sums via a left shift instead of recomputing them.
///
/// `r.len()` must equal `2 * a.len()`.
pub fn sqr(r: &mut [u64], a: &[u64]) {
    let n = a.len();
    debug_assert_eq!(r.len(), 2 * n);
    r.fill(0);

    // Off-diagonal terms a[i]*a[j], i<j, accumulated once then doubled.
    for i in 0..n {
        if a[i] == 0 {
            continue;
        }
        let mut carry: u128 = 0;
        for j in (i + 1)..n {
            let acc = r[i + j] as u128 + (a[i] as u128) * (a[j] as u128) + carry;
            r[i + j] = acc as u64;
            carry = acc >> 64;
        }
        let mut k = i + n;
        while carry != 0 {
            let acc = r[k] as u128 + carry;
            r[k] = acc as u64;
            carry = acc >> 64;
            k += 1;
        }
    }

    let dbl_carry = shl_inplace_one_bit(r);
    debug_assert_eq!(dbl_carry, 0, "cross terms cannot overflow 2n limbs");

    // Diagonal terms a[i]*a[i].
    let mut carry: u128 = 0;
    for i in 0..n {
        let sq = (a[i] as u128) * (a[i] as u128) + carry;
        let lo = sq as u64;
        let hi = (sq >> 64) as u64;
        let acc = r[2 * i] as u128 + lo as u128;
        r[2 * i] = acc as u64;
        carry = hi as u128 + (acc >> 64);
        if 2 * i + 1 < r.len() {
            let acc2 = r[2 * i + 1] as u128 + carry;
            r[2 * i + 1] = acc2 as u64;
            carry = acc2 >> 64;
        }
    }
}

fn shl_inplace_one_bit(r: &mut [u64]) -> u64 {
    let mut carry = 0u64;
    for limb in r.iter_mut() {
        let new_carry = *limb >> 63;
        *limb = (*limb << 1) | carry;
        carry = new_carry;
    }
    carry
}

/// Left shift by an arbitrary bit count; vacated limbs are zeroed.
///
/// `r.len()` must equal `a.len()`.
pub fn shl(r: &mut [u64], a: &[u64], bits: u32) {
    debug_assert_eq!(r.len(), a.len());
    let n = a.len();
    let limb_shift = (bits as usize / 64).min(n);
    let bit_shift = bits % 64;

    for i in (0..n).rev() {
        let src = i as isize - limb_shift as isize;
        let cur = if src >= 0 { a[src as usize] } else { 0 };
        let prev = if src - 1 >= 0 { a[(src - 1) as usize] } else { 0 };
        r[i] = if bit_shift == 0 {
            cur
        } else {
            (cur << bit_shift) | (prev >> (64 - bit_shift))
        };
    }
}

/// Right shift by an arbitrary bit count; vacated limbs are zeroed.
///
/// `r.len()` must equal `a.len()`.
pub fn shr(r: &mut [u64], a: &[u64], bits: u32) {
    debug_assert_eq!(r.len(), a.len());
    let n = a.len();
    let limb_shift = (bits as usize / 64).min(n);
    let bit_shift = bits % 64;

    for i in 0..n {
        let src = i + limb_shift;
        let cur = a.get(src).copied().unwrap_or(0);
        let next = a.get(src + 1).copied().unwrap_or(0);
        r[i] = if bit_shift == 0 {
            cur
        } else {
            (cur >> bit_shift) | next.checked_shl(64 - bit_shift).unwrap_or(0)
        };
    }
}

/// Knuth Algorithm D: `a = q*b + r`, `0 <= r < b`.
///
/// `b` must be non-zero. `q.len()` must be at least `a.len() - real_size(b) + 1`
/// and `rem.len()` must be at least `real_size(b)`; both are zero-filled by
/// this function before use.
pub fn divmod(q: &mut [u64], rem: &mut [u64], a: &[u64], b: &[u64]) {
    let bn = real_size(b);
    assert!(bn > 0, "division by zero");
    let an = real_size(a);

    q.fill(0);
    rem.fill(0);

    if an < bn || (an == bn && cmp(&a[..an], &b[..bn]) == Ordering::Less) {
        rem[..an].copy_from_slice(&a[..an]);
        return;
    }

    if bn == 1 {
        let divisor = b[0];
        let mut remainder: u128 = 0;
        for i in (0..an).rev() {
            let cur = (remainder << 64) | a[i] as u128;
            q[i] = (cur / divisor as u128) as u64;
            remainder = cur % divisor as u128;
        }
        rem[0] = remainder as u64;
        return;
    }

    // Normalise so the top limb of the divisor has its high bit set.
    let shift = b[bn - 1].leading_zeros();
    let mut vn = vec![0u64; bn];
    shl(&mut vn, &b[..bn], shift);

    let mut un = vec![0u64; an + 1];
    {
        let mut tmp = vec![0u64; an];
        shl(&mut tmp, &a[..an], shift);
        un[..an].copy_from_slice(&tmp);
        if shift > 0 {
            un[an] = a[an - 1] >> (64 - shift);
        }
    }

    let m = an - bn;
    for j in (0..=m).rev() {
        let top = (un[j + bn] as u128) << 64 | un[j + bn - 1] as u128;
        let mut qhat = top / vn[bn - 1] as u128;
        let mut rhat = top % vn[bn - 1] as u128;

        while qhat >= 1u128 << 64
            || (bn >= 2 && qhat * vn[bn - 2] as u128 > (rhat << 64) + un[j + bn - 2] as u128)
        {
            qhat -= 1;
            rhat += vn[bn - 1] as u128;
            if rhat >= 1u128 << 64 {
                break;
            }
        }

        // Multiply and subtract.
        let mut borrow: i128 = 0;
        let mut carry: u128 = 0;
        for i in 0..bn {
            let p = qhat * vn[i] as u128 + carry;
            carry = p >> 64;
            let sub = (un[j + i] as i128) - (p as u64 as i128) - borrow;
            if sub < 0 {
                un[j + i] = (sub + (1i128 << 64)) as u64;
                borrow = 1;
            } else {
                un[j + i] = sub as u64;
                borrow = 0;
            }
        }
        let sub = (un[j + bn] as i128) - carry as i128 - borrow;
        let underflow = sub < 0;
        un[j + bn] = sub as u64;

        if underflow {
            // qhat was one too large: add back.
            qhat -= 1;
            let mut carry2 = 0u128;
            for i in 0..bn {
                let s = un[j + i] as u128 + vn[i] as u128 + carry2;
                un[j + i] = s as u64;
                carry2 = s >> 64;
            }
            un[j + bn] = un[j + bn].wrapping_add(carry2 as u64);
        }

        q[j] = qhat as u64;
    }

    let mut rshift = vec![0u64; bn];
    shr(&mut rshift, &un[..bn], shift);
    rem[..bn].copy_from_slice(&rshift);
}

/// `r <- a mod b`; a thin wrapper around [`divmod`] that discards the quotient.
pub fn modulus(rem: &mut [u64], a: &[u64], b: &[u64]) {
    let bn = real_size(b).max(1);
    let an = real_size(a);
    let mut q = vec![0u64; an + 1];
    divmod(&mut q, rem, a, b);
    let _ = bn;
}

/// Binary (Stein's) GCD.
pub fn gcd(a: &[u64], b: &[u64]) -> Vec<u64> {
    let n = a.len().max(b.len());
    let mut u = vec![0u64; n];
    let mut v = vec![0u64; n];
    u[..a.len()].copy_from_slice(a);
    v[..b.len()].copy_from_slice(b);

    if real_size(&u) == 0 {
        return v;
    }
    if real_size(&v) == 0 {
        return u;
    }

    let uz = trailing_zero_bits(&u);
    let vz = trailing_zero_bits(&v);
    let shift = uz.min(vz);
    shr_into_self(&mut u, uz);
    shr_into_self(&mut v, vz);

    loop {
        if real_size(&v) == 0 {
            break;
        }
        let tz = trailing_zero_bits(&v);
        shr_into_self(&mut v, tz);

        if cmp(&u, &v) == Ordering::Greater {
            std::mem::swap(&mut u, &mut v);
        }
        // v <- v - u
        let mut tmp = vec![0u64; n];
        sub(&mut tmp, &v, &u);
        v = tmp;
    }

    shl_into_self(&mut u, shift);
    u
}

fn trailing_zero_bits(a: &[u64]) -> u32 {
    for (i, &limb) in a.iter().enumerate() {
        if limb != 0 {
            return (i as u32) * 64 + limb.trailing_zeros();
        }
    }
    (a.len() as u32) * 64
}

fn shr_into_self(a: &mut Vec<u64>, bits: u32) {
    let n = a.len();
    let mut out = vec![0u64; n];
    shr(&mut out, a, bits);
    *a = out;
}

fn shl_into_self(a: &mut Vec<u64>, bits: u32) {
    let n = a.len();
    let mut out = vec![0u64; n];
    shl(&mut out, a, bits);
    *a = out;
}


/// A small signed-magnitude big integer used only to track Bezout
/// coefficients inside [`mod_inv`]. Magnitudes are plain little-endian
/// limb vectors, always real-sized to at least one limb.
#[derive(Clone)]
struct Signed {
    neg: bool,
    mag: Vec<u64>,
}

impl Signed {
    fn from_mag(mag: Vec<u64>) -> Self {
        let rs = real_size(&mag).max(1);
        Signed { neg: false, mag: mag[..rs].to_vec() }
    }

    fn zero() -> Self {
        Signed { neg: false, mag: vec![0] }
    }

    fn one() -> Self {
        Signed { neg: false, mag: vec![1] }
    }

    fn is_zero(&self) -> bool {
        real_size(&self.mag) == 0
    }

    fn negate(&self) -> Self {
        if self.is_zero() {
            self.clone()
        } else {
            Signed { neg: !self.neg, mag: self.mag.clone() }
        }
    }

    fn add(&self, other: &Signed) -> Signed {
        if self.neg == other.neg {
            let n = self.mag.len().max(other.mag.len());
            let mut r = vec![0u64; n];
            let carry = add(&mut r, &self.mag, &other.mag);
            if carry != 0 {
                r.push(carry);
            }
            let rs = real_size(&r).max(1);
            Signed { neg: if rs == 0 { false } else { self.neg }, mag: r[..rs].to_vec() }
        } else {
            let n = self.mag.len().max(other.mag.len());
            let mut r = vec![0u64; n];
            let self_smaller = sub(&mut r, &self.mag, &other.mag);
            let rs = real_size(&r).max(1);
            let sign = if self_smaller { other.neg } else { self.neg };
            Signed { neg: if real_size(&r) == 0 { false } else { sign }, mag: r[..rs].to_vec() }
        }
    }

    fn sub(&self, other: &Signed) -> Signed {
        self.add(&other.negate())
    }

    fn mul(&self, other: &Signed) -> Signed {
        let n = self.mag.len() + other.mag.len();
        let mut r = vec![0u64; n];
        mul(&mut r, &self.mag, &other.mag);
        let rs = real_size(&r).max(1);
        let neg = self.neg != other.neg;
        Signed { neg: if real_size(&r) == 0 { false } else { neg }, mag: r[..rs].to_vec() }
    }
}

/// Modular inverse of `a` mod `m` via the extended Euclidean algorithm.
///
/// Returns `None` when `gcd(a, m) != 1` (an *arithmetic exceptional value*
/// per the crate's error taxonomy, not a panic). The result, when present,
/// occupies exactly `m.len()` limbs and lies in `[0, m)`.
pub fn mod_inv(a: &[u64], m: &[u64]) -> Option<Vec<u64>> {
    let mut old_r = Signed::from_mag(a.to_vec());
    let mut r = Signed::from_mag(m.to_vec());
    let mut old_s = Signed::one();
    let mut s = Signed::zero();

    while !r.is_zero() {
        let mut q = vec![0u64; old_r.mag.len() + 1];
        let mut rem = vec![0u64; r.mag.len()];
        divmod(&mut q, &mut rem, &old_r.mag, &r.mag);
        let q_signed = Signed::from_mag(q);
        let rem_signed = Signed::from_mag(rem);

        old_r = r;
        r = rem_signed;

        let t = old_s.sub(&q_signed.mul(&s));
        old_s = s;
        s = t;
    }

    // old_r now holds gcd(a, m); invertible iff it equals 1.
    if !(old_r.mag.len() == 1 && old_r.mag[0] == 1) {
        return None;
    }

    let m_len = real_size(m).max(1);
    let mut q = vec![0u64; old_s.mag.len() + 1];
    let mut rem = vec![0u64; m_len];
    divmod(&mut q, &mut rem, &old_s.mag, &m[..m_len]);

    if old_s.neg && real_size(&rem) != 0 {
        let mut out = vec![0u64; m_len];
        sub(&mut out, &m[..m_len], &rem);
        rem = out;
    }

    let mut result = vec![0u64; m.len()];
    let copy_len = rem.len().min(result.len());
    result[..copy_len].copy_from_slice(&rem[..copy_len]);
    Some(result)
}

/// Montgomery multiplication for width `S`: `r <- a*b*R^-1 mod m`.
///
/// `a`, `b`, `m`, `k`, and `r` must all have the same length `S`; `k` is the
/// modulus-specific constant `(R*R^-1 - 1) / m` from [`crate::bigint::montgomery::MontgomeryCtx`].
/// `a` and `b` must already be in Montgomery form and reduced mod `m`.
pub fn mont_mul(r: &mut [u64], a: &[u64], b: &[u64], m: &[u64], k: &[u64]) {
    let s = m.len();
    debug_assert_eq!(a.len(), s);
    debug_assert_eq!(b.len(), s);
    debug_assert_eq!(k.len(), s);
    debug_assert_eq!(r.len(), s);

    let mut t = vec![0u64; 2 * s];
    mul(&mut t, a, b);
    mont_reduce(r, &t, m, k);
}

/// Montgomery squaring: as [`mont_mul`] but using the cheaper `sqr` kernel.
pub fn mont_sqr(r: &mut [u64], a: &[u64], m: &[u64], k: &[u64]) {
    let s = m.len();
    debug_assert_eq!(a.len(), s);

    let mut t = vec![0u64; 2 * s];
    sqr(&mut t, a);
    mont_reduce(r, &t, m, k);
}

/// Core of the Montgomery reduction shared by [`mont_mul`] and [`mont_sqr`]:
/// reduces a `2S`-limb product `t` to an `S`-limb residue mod `m`.
fn mont_reduce(r: &mut [u64], t: &[u64], m: &[u64], k: &[u64]) {
    let s = m.len();
    debug_assert_eq!(t.len(), 2 * s);

    let t_low = &t[..s];
    let mut u_full = vec![0u64; 2 * s];
    mul(&mut u_full, t_low, k);
    let u = &u_full[..s];

    let mut um = vec![0u64; 2 * s];
    mul(&mut um, u, m);

    let mut sum = vec![0u64; 2 * s + 1];
    let carry = add(&mut sum[..2 * s], t, &um);
    sum[2 * s] = carry;

    let hi = &sum[s..2 * s + 1];
    if cmp(hi, m) != Ordering::Less {
        let mut tmp = vec![0u64; s + 1];
        sub(&mut tmp, hi, m);
        r.copy_from_slice(&tmp[..s]);
        debug_assert_eq!(tmp[s], 0, "montgomery reduction result must fit in S limbs");
    } else {
        r.copy_from_slice(&hi[..s]);
    }
}

/// Barrett reduction for width `S`: reduces a `2S`-limb value `a` modulo `n`
/// using the precomputed reciprocal `r_const = floor(2^k_bits / n)`.
///
/// A single correction subtraction suffices because `r_const < 2^(k_bits+1)/n`
/// bounds the quotient estimate's error to at most 2 (see
/// [`crate::bigint::barrett::BarrettCtx`]).
pub fn barrett_reduce(out: &mut [u64], a: &[u64], n: &[u64], r_const: &[u64], k_bits: u32) {
    let s = n.len();
    debug_assert_eq!(out.len(), s);

    let mut prod = vec![0u64; a.len() + r_const.len()];
    mul(&mut prod, a, r_const);

    let shift_limbs = (k_bits / 64) as usize;
    let shift_bits = k_bits % 64;
    let q_len = prod.len().saturating_sub(shift_limbs);
    let mut q = vec![0u64; q_len.max(1)];
    if q_len > 0 {
        shr(&mut q, &prod[shift_limbs..], shift_bits);
    }

    // Only the low S+1 limbs of q*n matter for a mod 2^(64*(S+1)) result.
    let qn_limbs = (s + 1).min(q.len());
    let mut qm = vec![0u64; 2 * (s + 1)];
    mul(&mut qm, &q[..qn_limbs], n);

    let a_len = (s + 1).min(a.len());
    let mut r = vec![0u64; s + 1];
    r[..a_len].copy_from_slice(&a[..a_len]);
    let mut diff = vec![0u64; s + 1];
    let negative = sub(&mut diff, &r, &qm[..s + 1]);
    debug_assert!(!negative, "barrett quotient estimate must not undershoot");

    if cmp(&diff, n) != Ordering::Less {
        let mut corrected = vec![0u64; s + 1];
        sub(&mut corrected, &diff, n);
        diff = corrected;
        debug_assert!(cmp(&diff, n) == Ordering::Less, "single correction must suffice");
    }

    out.copy_from_slice(&diff[..s]);
}
