/// Worker pool helpers

/// A local pool with exactly `threads` workers (at least one)
pub fn build_pool(threads: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("sparqlbench-worker-{}", i))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_pool_size() {
        let pool = build_pool(3).unwrap();
        assert_eq!(pool.current_num_threads(), 3);

        let pool = build_pool(0).unwrap();
        assert_eq!(pool.current_num_threads(), 1);
    }
}
