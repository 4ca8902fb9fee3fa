//! Random choice with repeat avoidance.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::cache::CachedImage;

/// Picks one image at random, preferring ones it has not returned before.
///
/// The memory of previous picks lives only as long as the chooser.
#[derive(Debug)]
pub struct Chooser<R = StdRng> {
    rng: R,
    already_chosen: HashSet<String>,
}

impl Chooser<StdRng> {
    /// Chooser seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for Chooser<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Chooser<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            already_chosen: HashSet::new(),
        }
    }

    /// Pick one of `eligible`, or `None` if it is empty.
    ///
    /// Falls back to the whole set once every image was already chosen.
    pub fn choose<'a>(&mut self, eligible: &'a [CachedImage]) -> Option<&'a CachedImage> {
        let fresh: Vec<&CachedImage> = eligible
            .iter()
            .filter(|image| !self.already_chosen.contains(image.candidate().url()))
            .collect();

        let picked = match fresh.choose(&mut self.rng) {
            Some(image) => *image,
            None => eligible.choose(&mut self.rng)?,
        };

        self.already_chosen
            .insert(picked.candidate().url().to_string());
        Some(picked)
    }

    /// True if `image` was returned by an earlier call.
    pub fn was_chosen(&self, image: &CachedImage) -> bool {
        self.already_chosen.contains(image.candidate().url())
    }

    pub fn chosen_count(&self) -> usize {
        self.already_chosen.len()
    }
}
