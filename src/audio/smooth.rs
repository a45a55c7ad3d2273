/// Median filter followed by a moving average of the same odd width.
///
/// Both passes pad with edge replication, so the output has exactly the
/// input's length. A width of 1 returns the input unchanged; an even width
/// behaves like the next odd one.
pub fn smooth_contour(frequencies: &[f32], window: usize) -> Vec<f32> {
    if frequencies.is_empty() || window <= 1 {
        return frequencies.to_vec();
    }
    let medians = median_filter(frequencies, window);
    moving_average(&medians, window)
}

fn padded(values: &[f32], i: isize) -> f32 {
    let last = values.len() as isize - 1;
    values[i.clamp(0, last) as usize]
}

fn median_filter(values: &[f32], window: usize) -> Vec<f32> {
    let half = (window / 2) as isize;
    let mut buf = Vec::with_capacity(window);

    (0..values.len() as isize)
        .map(|i| {
            buf.clear();
            buf.extend((i - half..=i + half).map(|j| padded(values, j)));
            buf.sort_by(f32::total_cmp);
            buf[buf.len() / 2]
        })
        .collect()
}

fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    let half = (window / 2) as isize;
    let span = (2 * half + 1) as f32;
    (0..values.len() as isize)
        .map(|i| {
            let sum: f32 = (i - half..=i + half).map(|j| padded(values, j)).sum();
            sum / span
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_length() {
        for n in [0usize, 1, 2, 4, 5, 17] {
            let input: Vec<f32> = (0..n).map(|i| i as f32).collect();
            assert_eq!(smooth_contour(&input, 5).len(), n);
        }
    }

    #[test]
    fn constant_contour_is_unchanged() {
        let input = vec![261.63f32; 12];
        for v in smooth_contour(&input, 5) {
            assert!((v - 261.63).abs() < 1e-3);
        }
    }

    #[test]
    fn removes_isolated_spike() {
        let mut input = vec![220.0f32; 11];
        input[5] = 880.0; // octave jump
        let out = smooth_contour(&input, 5);
        assert!(out.iter().all(|&v| (v - 220.0).abs() < 1e-3));
    }

    #[test]
    fn removes_isolated_dropout() {
        let mut input = vec![300.0f32; 9];
        input[4] = 0.0;
        let out = smooth_contour(&input, 5);
        assert!(out.iter().all(|&v| (v - 300.0).abs() < 1e-3));
    }

    #[test]
    fn edges_use_replication() {
        let input = [100.0f32, 200.0, 200.0, 200.0, 200.0];
        // median at index 0 sees [100, 100, 100, 200, 200]
        assert_eq!(median_filter(&input, 5)[0], 100.0);
        let avg = moving_average(&[1.0, 2.0, 3.0], 3);
        assert_eq!(avg, vec![(1.0 + 1.0 + 2.0) / 3.0, 2.0, (2.0 + 3.0 + 3.0) / 3.0]);
    }

    #[test]
    fn even_window_keeps_level() {
        let input = vec![300.0f32; 10];
        for v in smooth_contour(&input, 4) {
            assert!((v - 300.0).abs() < 1e-3, "got {}", v);
        }
        assert_eq!(smooth_contour(&input, 4), smooth_contour(&input, 5));
    }

    #[test]
    fn window_of_one_is_identity() {
        let input = [1.0f32, 9.0, 2.0];
        assert_eq!(smooth_contour(&input, 1), input.to_vec());
    }
}
