//! Swatch selection over quantized clusters.
//!
//! Each slot has a target lightness and saturation window; the cluster that
//! scores best against the targets (weighted by population) fills the slot.
//! A cluster fills at most one slot.

use crate::types::{Colour, Palette, Swatch};

use super::quantize::Cluster;

const TARGET_DARK_LUMA: f32 = 0.26;
const MAX_DARK_LUMA: f32 = 0.45;
const MIN_LIGHT_LUMA: f32 = 0.55;
const TARGET_LIGHT_LUMA: f32 = 0.74;
const MIN_NORMAL_LUMA: f32 = 0.3;
const TARGET_NORMAL_LUMA: f32 = 0.5;
const MAX_NORMAL_LUMA: f32 = 0.7;

const TARGET_MUTED_SATURATION: f32 = 0.3;
const MAX_MUTED_SATURATION: f32 = 0.4;
const TARGET_VIBRANT_SATURATION: f32 = 1.0;
const MIN_VIBRANT_SATURATION: f32 = 0.35;

const WEIGHT_SATURATION: f32 = 3.0;
const WEIGHT_LUMA: f32 = 6.5;
const WEIGHT_POPULATION: f32 = 0.5;

/// Lightness and saturation window for one slot.
#[derive(Debug, Clone, Copy)]
struct Target {
    luma: (f32, f32, f32),
    saturation: (f32, f32, f32),
}

impl Target {
    fn for_swatch(swatch: Swatch) -> Self {
        let dark = (TARGET_DARK_LUMA, 0.0, MAX_DARK_LUMA);
        let normal = (TARGET_NORMAL_LUMA, MIN_NORMAL_LUMA, MAX_NORMAL_LUMA);
        let light = (TARGET_LIGHT_LUMA, MIN_LIGHT_LUMA, 1.0);
        let vibrant = (TARGET_VIBRANT_SATURATION, MIN_VIBRANT_SATURATION, 1.0);
        let muted = (TARGET_MUTED_SATURATION, 0.0, MAX_MUTED_SATURATION);

        let (luma, saturation) = match swatch {
            Swatch::Vibrant => (normal, vibrant),
            Swatch::DarkVibrant => (dark, vibrant),
            Swatch::LightVibrant => (light, vibrant),
            Swatch::Muted => (normal, muted),
            Swatch::DarkMuted => (dark, muted),
            Swatch::LightMuted => (light, muted),
        };
        Self { luma, saturation }
    }

    fn accepts(&self, saturation: f32, luma: f32) -> bool {
        (self.saturation.1..=self.saturation.2).contains(&saturation)
            && (self.luma.1..=self.luma.2).contains(&luma)
    }

    fn score(&self, saturation: f32, luma: f32, population: f32) -> f32 {
        let invert_diff = |value: f32, target: f32| 1.0 - (value - target).abs();
        let weighted = invert_diff(saturation, self.saturation.0) * WEIGHT_SATURATION
            + invert_diff(luma, self.luma.0) * WEIGHT_LUMA
            + population * WEIGHT_POPULATION;
        weighted / (WEIGHT_SATURATION + WEIGHT_LUMA + WEIGHT_POPULATION)
    }
}

/// Slots in the order they claim clusters.
const SELECTION_ORDER: [Swatch; 6] = [
    Swatch::Vibrant,
    Swatch::LightVibrant,
    Swatch::DarkVibrant,
    Swatch::Muted,
    Swatch::LightMuted,
    Swatch::DarkMuted,
];

/// Pick a swatch for every slot the clusters can cover.
pub fn select_swatches(clusters: &[Cluster]) -> Palette {
    let max_population = clusters.iter().map(|c| c.population).max().unwrap_or(0) as f32;
    let hsl: Vec<(f32, f32)> = clusters
        .iter()
        .map(|c| {
            let hsl = c.colour.to_hsl();
            (hsl.saturation, hsl.lightness)
        })
        .collect();

    let mut taken = vec![false; clusters.len()];
    let mut palette = Palette::new();

    for swatch in SELECTION_ORDER {
        let target = Target::for_swatch(swatch);
        let mut best: Option<(usize, f32)> = None;

        for (i, cluster) in clusters.iter().enumerate() {
            let (saturation, luma) = hsl[i];
            if taken[i] || !target.accepts(saturation, luma) {
                continue;
            }
            let population = cluster.population as f32 / max_population;
            let score = target.score(saturation, luma, population);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((i, score));
            }
        }

        if let Some((i, _)) = best {
            taken[i] = true;
            palette.insert(swatch, clusters[i].colour);
        }
    }

    fill_vibrant_gaps(&mut palette);
    palette
}

/// Derive missing vibrant slots from a present sibling by moving its lightness
/// to the missing slot's target.
fn fill_vibrant_gaps(palette: &mut Palette) {
    let with_lightness = |colour: Colour, lightness: f32| {
        let mut hsl = colour.to_hsl();
        hsl.lightness = lightness;
        Colour::from_hsl(hsl)
    };

    if !palette.contains(Swatch::Vibrant) {
        let sibling = palette
            .get(Swatch::DarkVibrant)
            .or_else(|| palette.get(Swatch::LightVibrant));
        if let Some(colour) = sibling {
            palette.insert(Swatch::Vibrant, with_lightness(colour, TARGET_NORMAL_LUMA));
        }
    }

    if let Some(vibrant) = palette.get(Swatch::Vibrant) {
        if !palette.contains(Swatch::DarkVibrant) {
            palette.insert(Swatch::DarkVibrant, with_lightness(vibrant, TARGET_DARK_LUMA));
        }
        if !palette.contains(Swatch::LightVibrant) {
            palette.insert(Swatch::LightVibrant, with_lightness(vibrant, TARGET_LIGHT_LUMA));
        }
    }
}
