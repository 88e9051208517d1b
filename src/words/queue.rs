use crate::rng::GameRng;

/// Shown in place of a word when the canonical list is empty.
pub const PLACEHOLDER: &str = "—";

/// Shuffled draw pile over the canonical list.
///
/// The cursor always points at a valid word while the pile is non-empty.
/// Stepping past the last word rebuilds the pile from the canonical list
/// plus any words still unused, reshuffles it and starts again at 0, so
/// words may repeat once the pile has wrapped.
#[derive(Debug, Clone)]
pub struct WordQueue {
    canonical: Vec<String>,
    pile: Vec<String>,
    cursor: usize,
}

impl WordQueue {
    /// An empty pile over `canonical`; call [`WordQueue::reshuffle`] to deal.
    pub fn new(canonical: Vec<String>) -> Self {
        Self {
            canonical,
            pile: Vec::new(),
            cursor: 0,
        }
    }

    pub fn shuffled(canonical: Vec<String>, rng: &mut GameRng) -> Self {
        let mut queue = Self::new(canonical);
        queue.reshuffle(rng);
        queue
    }

    /// Throws the pile away and deals a fresh shuffle of the canonical list.
    pub fn reshuffle(&mut self, rng: &mut GameRng) {
        self.pile = self.canonical.clone();
        rng.shuffle(&mut self.pile);
        self.cursor = 0;
    }

    pub fn current(&self) -> Option<&str> {
        self.pile.get(self.cursor).map(String::as_str)
    }

    pub fn advance(&mut self, rng: &mut GameRng) {
        if self.cursor + 1 < self.pile.len() {
            self.cursor += 1;
            return;
        }
        if self.canonical.is_empty() && self.pile.is_empty() {
            return;
        }

        let unused = self.pile.split_off((self.cursor + 1).min(self.pile.len()));
        let mut replenished = self.canonical.clone();
        replenished.extend(unused);
        rng.shuffle(&mut replenished);

        self.pile = replenished;
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.pile.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pile.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn canonical(&self) -> &[String] {
        &self.canonical
    }
}
