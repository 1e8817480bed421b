//! Row-band partitioning for parallel rendering.
//!
//! The image's rows are split into contiguous bands, one per worker. Every
//! band is rendered independently and owns its rows exclusively, so the
//! framebuffer needs no locking.

/// A contiguous range of image rows, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Index of this band (0 is the top of the image)
    pub index: usize,
    /// First row, inclusive
    pub start: usize,
    /// Last row, exclusive
    pub end: usize,
}

impl Band {
    /// Number of rows in the band.
    pub fn rows(&self) -> usize {
        self.end - self.start
    }

    /// Check if the band covers no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `total_rows` into `worker_count` bands.
///
/// Every band is `total_rows / worker_count` rows tall except the last,
/// which also takes the remainder. A worker count of zero is treated as one.
/// When there are more workers than rows the leading bands are empty.
pub fn bands(total_rows: usize, worker_count: usize) -> Vec<Band> {
    let count = worker_count.max(1);
    let height = total_rows / count;

    (0..count)
        .map(|index| {
            let start = index * height;
            let end = if index == count - 1 {
                total_rows
            } else {
                start + height
            };
            Band { index, start, end }
        })
        .collect()
}

/// Number of render workers: the available hardware concurrency, or 1
/// when it cannot be determined.
pub fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(total_rows: usize, bands: &[Band]) {
        let mut next = 0;
        for band in bands {
            assert_eq!(band.start, next, "gap or overlap at band {}", band.index);
            assert!(band.end >= band.start);
            next = band.end;
        }
        assert_eq!(next, total_rows);
    }

    #[test]
    fn test_bands_exact_fit() {
        let b = bands(12, 4);
        assert_eq!(b.len(), 4);
        assert!(b.iter().all(|band| band.rows() == 3));
        assert_covers(12, &b);
    }

    #[test]
    fn test_last_band_takes_remainder() {
        let b = bands(10, 4);
        let rows: Vec<usize> = b.iter().map(|band| band.rows()).collect();
        assert_eq!(rows, vec![2, 2, 2, 4]);
        assert_covers(10, &b);
    }

    #[test]
    fn test_every_worker_count_covers_all_rows() {
        for total_rows in [1, 2, 7, 64, 97] {
            for workers in 1..=total_rows {
                let b = bands(total_rows, workers);
                assert_eq!(b.len(), workers);
                assert_covers(total_rows, &b);

                // Every row belongs to exactly one band
                let mut owners = vec![0u32; total_rows];
                for band in &b {
                    for row in band.start..band.end {
                        owners[row] += 1;
                    }
                }
                assert!(owners.iter().all(|&n| n == 1));
            }
        }
    }

    #[test]
    fn test_zero_workers_is_one_band() {
        let b = bands(5, 0);
        assert_eq!(b, vec![Band { index: 0, start: 0, end: 5 }]);
    }

    #[test]
    fn test_more_workers_than_rows() {
        let b = bands(3, 5);
        assert_covers(3, &b);
        assert!(b[..4].iter().all(Band::is_empty));
        assert_eq!(b[4].rows(), 3);
    }

    #[test]
    fn test_worker_count_at_least_one() {
        assert!(worker_count() >= 1);
    }
}
