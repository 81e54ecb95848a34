//! Question generation.
//!
//! Both generators are pure functions of the palette and the random source, so
//! a seeded `StdRng` reproduces a session exactly.

use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;

use crate::palette::{ColorSample, Palette};

pub const FIND_COLOR_OPTIONS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub displayed_name: String,
    pub displayed_color: ColorSample,
    /// True when the name and the displayed color are the same palette entry.
    pub is_match: bool,
    pub find: Option<FindColorChoice>,
}

/// Option grid of a find-color round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindColorChoice {
    pub options: Vec<ColorSample>,
    pub correct_index: usize,
}

impl Round {
    pub fn options(&self) -> Option<&[ColorSample]> {
        self.find.as_ref().map(|f| f.options.as_slice())
    }

    pub fn correct_option_index(&self) -> Option<usize> {
        self.find.as_ref().map(|f| f.correct_index)
    }
}

/// Name and color are drawn independently, so a match comes up with
/// probability `1 / palette.len()`.
pub fn generate_match_round<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> Round {
    let samples = palette.samples();
    let name_index = rng.gen_range(0..samples.len());
    let color_index = rng.gen_range(0..samples.len());
    log::debug!("match round: name #{name_index}, color #{color_index}");

    Round {
        displayed_name: samples[name_index].name.clone(),
        displayed_color: samples[color_index].clone(),
        is_match: name_index == color_index,
        find: None,
    }
}

pub fn generate_find_color_round<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> Round {
    generate_find_color_round_with(palette, FIND_COLOR_OPTIONS, rng)
}

/// Target plus up to `option_count - 1` distinct distractors, shuffled. Small
/// palettes yield fewer options.
pub fn generate_find_color_round_with<R: Rng + ?Sized>(
    palette: &Palette,
    option_count: usize,
    rng: &mut R,
) -> Round {
    let samples = palette.samples();
    let target_index = rng.gen_range(0..samples.len());
    let target = &samples[target_index];

    let others: Vec<&ColorSample> = samples
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != target_index)
        .map(|(_, s)| s)
        .collect();
    let distractors = option_count.saturating_sub(1).min(others.len());

    let mut options = Vec::with_capacity(distractors + 1);
    options.push(target.clone());
    for i in index::sample(rng, others.len(), distractors) {
        options.push(others[i].clone());
    }
    options.shuffle(rng);

    // Names are unique within a palette.
    let correct_index = options
        .iter()
        .position(|o| o.name == target.name)
        .unwrap_or(0);
    log::debug!(
        "find-color round: target {} at option {correct_index} of {}",
        target.name,
        options.len()
    );

    Round {
        displayed_name: target.name.clone(),
        displayed_color: target.clone(),
        is_match: true,
        find: Some(FindColorChoice {
            options,
            correct_index,
        }),
    }
}
