//! Plain-text summaries of solver output.

use std::fmt::Write;
use ndarray as nd;
use crate::solve::EigenResult;

/// Format the lowest `nstates` energies of `res` in increasing order, one per
/// line, with 1-based labels.
///
/// ```
/// use xsparse::{ potential::Harmonic, report, solve::{ SolverConfig, solve } };
///
/// let res = solve(&Harmonic::default(), &SolverConfig::default()).unwrap();
/// let text = report::summary(&res, 2);
/// assert_eq!(text, "Energy eigenvalues:\n1: 1.00\n2: 3.00\n");
/// ```
pub fn summary(res: &EigenResult, nstates: usize) -> String {
    let mut out = String::from("Energy eigenvalues:\n");
    for (k, i) in res.sorted_indices().into_iter().take(nstates).enumerate() {
        // writing to a String cannot fail
        let _ = writeln!(out, "{}: {:.2}", k + 1, res.evals[i]);
    }
    out
}

/// Collect the coordinate grid and the probability densities of the lowest
/// `nstates` states into columns, suitable for plotting.
///
/// Column 0 holds the coordinates; column `k + 1` holds `|ψ|²` for the state
/// with the `k`-th lowest energy.
pub fn density_table(res: &EigenResult, nstates: usize) -> nd::Array2<f64> {
    let idx: Vec<usize> = res.sorted_indices().into_iter().take(nstates).collect();
    let n = res.grid.len();
    let mut table: nd::Array2<f64> = nd::Array2::zeros((n, idx.len() + 1));
    table.column_mut(0).assign(res.grid.get_x());
    for (k, &i) in idx.iter().enumerate() {
        table.column_mut(k + 1).assign(&res.density(i));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ grid::Grid, utils::trapz };

    fn fake() -> EigenResult {
        let grid = Grid::new_linspace(0.0, 1.0, 3).unwrap();
        EigenResult {
            evals: nd::array![3.14159, -1.0, 0.5],
            evecs: nd::array![
                [1.0, 0.0, 2.0],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, -2.0],
            ],
            grid,
            max_imag: 0.0,
            iters: 1,
        }
    }

    #[test]
    fn summary_sorts_and_labels() {
        let text = summary(&fake(), 5);
        assert_eq!(text, "Energy eigenvalues:\n1: -1.00\n2: 0.50\n3: 3.14\n");
    }

    #[test]
    fn summary_truncates() {
        assert_eq!(summary(&fake(), 1), "Energy eigenvalues:\n1: -1.00\n");
    }

    #[test]
    fn density_columns() {
        let table = density_table(&fake(), 2);
        assert_eq!(table.dim(), (3, 3));
        assert_eq!(table.column(0), nd::array![0.0, 0.5, 1.0]);
        assert_eq!(table.column(1), nd::array![0.0, 1.0, 0.0]);
        assert_eq!(table.column(2), nd::array![4.0, 0.0, 4.0]);
        assert!((trapz(&table.column(2), 0.5) - 2.0).abs() < 1e-12);
    }
}
