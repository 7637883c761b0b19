//! Colour quantization of cover images.

use std::collections::HashMap;

use image::imageops::FilterType;
use image::DynamicImage;
use kmeans_colors::get_kmeans_hamerly;
use palette::Lab;

use crate::types::Colour;

/// A representative colour with the number of pixels it stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    pub colour: Colour,
    pub population: u32,
}

const MAX_DIM: u32 = 256;
const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const SEED: u64 = 42;
const DEDUP_THRESHOLD: f32 = 25.0; // ΔE² < 25 means ΔE < 5

/// Pixels more transparent than this are ignored.
const MIN_ALPHA: u8 = 125;

/// Pixels with every channel above this are treated as background white.
const WHITE_THRESHOLD: u8 = 250;

/// Quantize an image into at most `k` clusters, sorted by population
/// (descending).
///
/// The image is downscaled to fit within 256x256 first. Near-white and
/// mostly transparent pixels are skipped, so a blank image yields no
/// clusters.
pub fn quantize(image: &DynamicImage, k: usize) -> Vec<Cluster> {
    let image = if image.width() > MAX_DIM || image.height() > MAX_DIM {
        image.resize(MAX_DIM, MAX_DIM, FilterType::Triangle)
    } else {
        image.clone()
    };

    let mut histogram: HashMap<[u8; 3], u32> = HashMap::new();
    for pixel in image.to_rgba8().pixels() {
        let [r, g, b, a] = pixel.0;
        if a < MIN_ALPHA || (r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD) {
            continue;
        }
        *histogram.entry([r, g, b]).or_insert(0) += 1;
    }

    let mut clusters = if histogram.len() <= k {
        // Few distinct colours: they already are the clusters.
        histogram
            .into_iter()
            .map(|([r, g, b], population)| Cluster {
                colour: Colour::rgb(r, g, b),
                population,
            })
            .collect()
    } else {
        let mut pixels: Vec<([u8; 3], u32)> = histogram.into_iter().collect();
        // HashMap order is random; k-means seeding must not be.
        pixels.sort_unstable();
        let lab: Vec<Lab> = pixels
            .iter()
            .flat_map(|&([r, g, b], count)| {
                std::iter::repeat(Colour::rgb(r, g, b).to_lab()).take(count as usize)
            })
            .collect();
        kmeans(&lab, k)
    };

    deduplicate(&mut clusters);
    clusters.sort_by(|a, b| {
        b.population
            .cmp(&a.population)
            .then_with(|| a.colour.to_array().cmp(&b.colour.to_array()))
    });
    clusters
}

/// Run K-means (Hamerly, K-means++ seeding) over LAB pixels.
fn kmeans(pixels: &[Lab], k: usize) -> Vec<Cluster> {
    let result = get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, pixels, SEED);

    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    result
        .centroids
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(lab, population)| Cluster {
            colour: Colour::from_lab(*lab),
            population,
        })
        .collect()
}

/// Merge clusters that are too similar (ΔE < 5 in LAB space).
/// Keeps the more populous colour and accumulates the population.
fn deduplicate(clusters: &mut Vec<Cluster>) {
    clusters.sort_by(|a, b| b.population.cmp(&a.population));

    let mut i = 0;
    while i < clusters.len() {
        let lab_i = clusters[i].colour.to_lab();
        let mut j = i + 1;
        while j < clusters.len() {
            let lab_j = clusters[j].colour.to_lab();
            let delta_e_sq = (lab_i.l - lab_j.l).powi(2)
                + (lab_i.a - lab_j.a).powi(2)
                + (lab_i.b - lab_j.b).powi(2);
            if delta_e_sq < DEDUP_THRESHOLD {
                clusters[i].population += clusters[j].population;
                clusters.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}
