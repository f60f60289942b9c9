/// Fixed-capacity ring buffer of the most recent episode scores with a
/// running sum.
#[derive(Clone, Debug)]
pub struct ScoreWindow {
    slots: Vec<f32>,
    capacity: usize,
    next: usize,
    sum: f64,
}

impl ScoreWindow {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "score window needs room for one score");
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            next: 0,
            sum: 0.0,
        }
    }

    /// Appends `score`, evicting the oldest once full.
    pub fn push(&mut self, score: f32) {
        if self.slots.len() < self.capacity {
            self.slots.push(score);
        } else {
            self.sum -= f64::from(self.slots[self.next]);
            self.slots[self.next] = score;
        }
        self.sum += f64::from(score);
        self.next = (self.next + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Mean of the scores currently held; 0 when empty.
    #[allow(clippy::cast_possible_truncation)]
    pub fn mean(&self) -> f32 {
        if self.slots.is_empty() {
            0.0
        } else {
            (self.sum / self.slots.len() as f64) as f32
        }
    }

    /// Held scores, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let split = if self.is_full() { self.next } else { 0 };
        self.slots[split..]
            .iter()
            .chain(&self.slots[..split])
            .copied()
    }
}

/// Every episode score plus the rolling window used for the solved check.
#[derive(Clone, Debug)]
pub struct ScoreHistory {
    all: Vec<f32>,
    window: ScoreWindow,
}

impl ScoreHistory {
    /// # Panics
    ///
    /// Panics if `window` is zero.
    pub fn new(window: usize) -> Self {
        Self {
            all: Vec::new(),
            window: ScoreWindow::new(window),
        }
    }

    pub fn push(&mut self, score: f32) {
        self.all.push(score);
        self.window.push(score);
    }

    pub fn all(&self) -> &[f32] {
        &self.all
    }

    pub fn window(&self) -> &ScoreWindow {
        &self.window
    }

    pub fn rolling_mean(&self) -> f32 {
        self.window.mean()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.all
    }
}
