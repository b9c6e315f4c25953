use uot_core::BREAKDOWN;
use uot_core::DUAL_ATOL;
use uot_core::DUAL_ITERATIONS;
use uot_core::DUAL_RTOL;
use uot_core::Energy;
use uot_transport::Convergence;

/// Complementary slackness system of a 1-D coupling.
///
/// Unknowns are the stacked potentials `[α_0 .. α_{n-1}, β_0 .. β_{m-1}]`.
/// Row 0 pins the gauge with `Σ α_i = 0`; every mass-carrying edge `(i, j)`
/// contributes one row `α_i + β_j = c_ij`. The edges of a monotone coupling
/// form a forest, so the system is always consistent and its least-squares
/// solution satisfies every row exactly.
pub struct Slackness<'a> {
    n: usize,
    m: usize,
    edges: &'a [(usize, usize)],
}

impl<'a> Slackness<'a> {
    pub fn new(n: usize, m: usize, edges: &'a [(usize, usize)]) -> Self {
        Self { n, m, edges }
    }
    /// Number of unknowns.
    pub fn cols(&self) -> usize {
        self.n + self.m
    }
    /// Number of equations.
    pub fn rows(&self) -> usize {
        self.edges.len() + 1
    }
    /// Right-hand side for the given edge costs.
    pub fn rhs(&self, costs: &[Energy]) -> Vec<Energy> {
        std::iter::once(0.).chain(costs.iter().copied()).collect()
    }
    /// Exact solution on a spanning forest of the edges, gauged so that
    /// `Σ α_i = 0`.
    ///
    /// Each component is rooted at zero and every tree edge fixes its far
    /// endpoint. Edges closing a cycle are skipped, so inconsistent costs on
    /// a cycle remain as residual for [`cgls`] to reduce.
    pub fn propagate(&self, costs: &[Energy]) -> Vec<Energy> {
        let cols = self.cols();
        let mut adjacent = vec![Vec::<(usize, usize)>::new(); cols];
        for (e, &(i, j)) in self.edges.iter().enumerate() {
            adjacent[i].push((self.n + j, e));
            adjacent[self.n + j].push((i, e));
        }
        let mut z = vec![0.; cols];
        let mut seen = vec![false; cols];
        let mut stack = Vec::new();
        for root in 0..cols {
            if seen[root] {
                continue;
            }
            seen[root] = true;
            stack.push(root);
            while let Some(u) = stack.pop() {
                for &(v, e) in adjacent[u].iter() {
                    if !seen[v] {
                        seen[v] = true;
                        z[v] = costs[e] - z[u];
                        stack.push(v);
                    }
                }
            }
        }
        let shift = z[..self.n].iter().sum::<Energy>() / self.n.max(1) as Energy;
        z[..self.n].iter_mut().for_each(|a| *a -= shift);
        z[self.n..].iter_mut().for_each(|b| *b += shift);
        z
    }
    /// `A z`
    pub fn apply(&self, z: &[Energy]) -> Vec<Energy> {
        let (alpha, beta) = z.split_at(self.n);
        std::iter::once(alpha.iter().sum())
            .chain(self.edges.iter().map(|&(i, j)| alpha[i] + beta[j]))
            .collect()
    }
    /// `Aᵀ r`
    pub fn adjoint(&self, r: &[Energy]) -> Vec<Energy> {
        let mut z = vec![r[0]; self.n];
        z.extend(std::iter::repeat_n(0., self.m));
        for (&(i, j), &e) in self.edges.iter().zip(r[1..].iter()) {
            z[i] += e;
            z[self.n + j] += e;
        }
        z
    }
}

/// Stopping rule for [`cgls`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CglsOptions {
    pub atol: Energy,
    pub rtol: Energy,
    pub max_iter: usize,
}

impl Default for CglsOptions {
    fn default() -> Self {
        Self {
            atol: DUAL_ATOL,
            rtol: DUAL_RTOL,
            max_iter: DUAL_ITERATIONS,
        }
    }
}

impl CglsOptions {
    /// Iteration budget scaled to the system size. In exact arithmetic CGLS
    /// terminates within `cols` steps, so the budget never undercuts that.
    pub fn sized(cols: usize) -> Self {
        Self {
            max_iter: DUAL_ITERATIONS.max(4 * cols),
            ..Self::default()
        }
    }
}

/// Conjugate gradient on the normal equations, `AᵀA z = Aᵀ rhs`, from `guess`
/// or zero.
///
/// ```text
/// z = z0, r = rhs - A z0, s = Aᵀr, p = s, γ = ‖s‖²
/// loop:
///     q = A p
///     step = γ / ‖q‖²
///     z += step·p
///     r -= step·q
///     s = Aᵀr
///     stop if ‖r‖ is small enough, or ‖s‖ has stagnated
///     p = s + (‖s‖² / γ)·p
/// ```
///
/// Convergence is judged on the system residual `‖rhs - A z‖` alone. A
/// stagnated normal residual ends the loop early but only counts as
/// converged if the system residual also meets its tolerance.
pub fn cgls(
    system: &Slackness,
    rhs: &[Energy],
    guess: Option<Vec<Energy>>,
    options: CglsOptions,
) -> (Vec<Energy>, Convergence) {
    let mut z = guess.unwrap_or_else(|| vec![0.; system.cols()]);
    let mut r = rhs.to_vec();
    axpy(&mut r, -1., &system.apply(&z));
    let mut s = system.adjoint(&r);
    let mut p = s.clone();
    let mut gamma = dot(&s, &s);
    let system_tol = options.atol + options.rtol * norm(rhs);
    let normal_tol = options.atol + options.rtol * gamma.sqrt();
    let met = |r: &[Energy]| norm(r) <= system_tol;
    if met(&r) || gamma.sqrt() <= normal_tol {
        return (z, report(&r, 0, system_tol));
    }
    for iteration in 0..options.max_iter {
        let q = system.apply(&p);
        let delta = dot(&q, &q);
        if delta < BREAKDOWN {
            return (z, report(&r, iteration, system_tol));
        }
        let step = gamma / delta;
        axpy(&mut z, step, &p);
        axpy(&mut r, -step, &q);
        s = system.adjoint(&r);
        let next = dot(&s, &s);
        if met(&r) || next.sqrt() <= normal_tol {
            return (z, report(&r, iteration + 1, system_tol));
        }
        let beta = next / gamma;
        p.iter_mut().zip(s.iter()).for_each(|(p, s)| *p = s + beta * *p);
        gamma = next;
    }
    (z, report(&r, options.max_iter, system_tol))
}

fn report(r: &[Energy], iterations: usize, tolerance: Energy) -> Convergence {
    let residual = norm(r);
    Convergence {
        residual,
        iterations,
        converged: residual <= tolerance,
    }
}

fn dot(u: &[Energy], v: &[Energy]) -> Energy {
    u.iter().zip(v.iter()).map(|(u, v)| u * v).sum()
}

fn norm(u: &[Energy]) -> Energy {
    dot(u, u).sqrt()
}

fn axpy(y: &mut [Energy], a: Energy, x: &[Energy]) {
    y.iter_mut().zip(x.iter()).for_each(|(y, x)| *y += a * x);
}
