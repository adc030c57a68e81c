/// Erlang B blocking probability of an M/G/n/n loss system with the given
/// offered load in Erlangs.
///
/// Uses the recurrence `B(0) = 1`, `B(k) = A B(k-1) / (k + A B(k-1))`, which
/// stays stable for large `n`.
pub fn erlang_b(servers: usize, offered_load: f64) -> f64 {
    (1..=servers).fold(1.0, |blocking, k| {
        let carried = offered_load * blocking;
        carried / (k as f64 + carried)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_server() {
        // B(1, A) = A / (1 + A)
        assert!((erlang_b(1, 3.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn six_servers_four_erlangs() {
        // 4^6/6! / sum_{k=0}^{6} 4^k/k!
        let terms: Vec<f64> = (0..=6)
            .scan(1.0, |term, k| {
                if k > 0 {
                    *term *= 4.0 / k as f64;
                }
                Some(*term)
            })
            .collect();
        let expected = terms[6] / terms.iter().sum::<f64>();
        assert!((erlang_b(6, 4.0) - expected).abs() < 1e-12);
        assert!((erlang_b(6, 4.0) - 0.117).abs() < 1e-3);
    }

    #[test]
    fn no_servers_blocks_everything() {
        assert_eq!(erlang_b(0, 2.0), 1.0);
    }
}
