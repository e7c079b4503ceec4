//! Per-pixel render time visualisation.
//!
//! Time is mapped to the red channel, scaled so the slowest pixel is 255.
//! Isolated one-pixel spikes (a context switch, a page fault) would squash
//! everything else to black, so they are left out of the scale.

use image::{Rgb, RgbImage};

/// A pixel slower than this many times every neighbour counts as a spike.
pub const SPIKE_FACTOR: u64 = 2;

fn is_spike(times: &[u32], width: u32, height: u32, x: u32, y: u32) -> bool {
    let at = |x: u32, y: u32| times[(y * width + x) as usize] as u64;
    let time = at(x, y);

    let mut neighbours = Vec::with_capacity(4);
    if x > 0 {
        neighbours.push(at(x - 1, y));
    }
    if x + 1 < width {
        neighbours.push(at(x + 1, y));
    }
    if y > 0 {
        neighbours.push(at(x, y - 1));
    }
    if y + 1 < height {
        neighbours.push(at(x, y + 1));
    }

    !neighbours.is_empty() && neighbours.iter().all(|&n| time > SPIKE_FACTOR * n)
}

/// Largest time that is not a spike; 0 when every pixel is a spike or the
/// buffer is empty.
pub fn normalization_max(times: &[u32], width: u32, height: u32) -> u32 {
    debug_assert_eq!(times.len(), width as usize * height as usize);

    let mut max = 0;
    for y in 0..height {
        for x in 0..width {
            if !is_spike(times, width, height, x, y) {
                max = max.max(times[(y * width + x) as usize]);
            }
        }
    }
    max
}

/// Render a time buffer (row-major, µs) as a red heatmap.
///
/// Values above the normalization maximum saturate at 255. A zero maximum
/// gives an all-black image.
pub fn time_heatmap(times: &[u32], width: u32, height: u32) -> RgbImage {
    let max = normalization_max(times, width, height) as u64;

    RgbImage::from_fn(width, height, |x, y| {
        if max == 0 {
            return Rgb([0, 0, 0]);
        }
        let time = times[(y * width + x) as usize] as u64;
        let red = (time * 255 / max).min(255) as u8;
        Rgb([red, 0, 0])
    })
}
