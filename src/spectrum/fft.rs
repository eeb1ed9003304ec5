//! Mixed-radix discrete Fourier transform.
//!
//! Recursive decimation in time over the smallest prime factor of the
//! length. Radices 2, 3 and 5 are the fast path; any other prime falls back
//! to a direct O(p²) butterfly, so every length is accepted.
use nalgebra::Complex;
use std::f64::consts::PI;

pub type C64 = Complex<f64>;

/// Smallest `m >= n` whose only prime factors are 2, 3 and 5.
pub fn optimal_dft_size(n: usize) -> usize {
    let mut m = n.max(1);
    loop {
        let mut r = m;
        for p in [2, 3, 5] {
            while r % p == 0 {
                r /= p;
            }
        }
        if r == 1 {
            return m;
        }
        m += 1;
    }
}

fn smallest_factor(n: usize) -> usize {
    for p in [2, 3, 5] {
        if n % p == 0 {
            return p;
        }
    }
    let mut p = 7;
    while p * p <= n {
        if n % p == 0 {
            return p;
        }
        p += 2;
    }
    n
}

/// Forward transform, unnormalised: `X[k] = Σ x[j]·e^(-2πi·jk/n)`.
pub fn fft(input: &[C64]) -> Vec<C64> {
    let n = input.len();
    if n <= 1 {
        return input.to_vec();
    }
    let p = smallest_factor(n);
    let m = n / p;
    if m == 1 {
        return naive_dft(input);
    }

    // p interleaved sub-sequences, each transformed recursively
    let subs: Vec<Vec<C64>> = (0..p)
        .map(|j| {
            let part: Vec<C64> = input.iter().skip(j).step_by(p).copied().collect();
            fft(&part)
        })
        .collect();

    let base = -2.0 * PI / n as f64;
    let mut out = vec![C64::new(0.0, 0.0); n];
    for (k, slot) in out.iter_mut().enumerate() {
        let km = k % m;
        let mut acc = C64::new(0.0, 0.0);
        for (j, sub) in subs.iter().enumerate() {
            let angle = base * ((j * k) % n) as f64;
            acc += sub[km] * C64::new(angle.cos(), angle.sin());
        }
        *slot = acc;
    }
    out
}

fn naive_dft(input: &[C64]) -> Vec<C64> {
    let n = input.len();
    let base = -2.0 * PI / n as f64;
    (0..n)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .map(|(j, &x)| {
                    let angle = base * ((j * k) % n) as f64;
                    x * C64::new(angle.cos(), angle.sin())
                })
                .sum()
        })
        .collect()
}

/// In-place 2-D transform of a row-major `w × h` buffer.
pub fn fft_2d(data: &mut [C64], w: usize, h: usize) {
    debug_assert_eq!(data.len(), w * h);
    for row in data.chunks_exact_mut(w) {
        let t = fft(row);
        row.copy_from_slice(&t);
    }
    let mut column = vec![C64::new(0.0, 0.0); h];
    for x in 0..w {
        for (y, c) in column.iter_mut().enumerate() {
            *c = data[y * w + x];
        }
        for (y, v) in fft(&column).into_iter().enumerate() {
            data[y * w + x] = v;
        }
    }
}
