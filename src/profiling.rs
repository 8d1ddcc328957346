use prelude_plus::*;

/// Rolling window of frame durations. Once the window is full the oldest
/// sample is overwritten.
#[derive(Debug)]
pub struct FrameTimeSampler {
  samples: Vec<Duration>,
  window: usize,
  next_slot: usize,
  frame_start: Option<Instant>,
}

impl FrameTimeSampler {
  pub fn new(window: usize) -> Self {
    let window = window.max(1);
    Self { samples: Vec::with_capacity(window), window, next_slot: 0, frame_start: None }
  }

  #[inline(always)]
  pub fn samples(&self) -> &[Duration] { &self.samples }

  pub fn push(&mut self, duration: Duration) {
    if self.samples.len() < self.window {
      self.samples.push(duration);
    } else {
      if self.next_slot >= self.samples.len() {
        self.next_slot = 0;
      }
      self.samples[self.next_slot] = duration;
    }
    self.next_slot += 1;
  }

  #[inline]
  pub fn begin_frame(&mut self) { self.frame_start = Some(Instant::now()); }

  /// Records the time since the last `begin_frame`. Does nothing if no frame
  /// was started.
  pub fn end_frame(&mut self) {
    if let Some(start) = self.frame_start.take() {
      self.push(start.elapsed());
    }
  }

  // An empty window sums up to zero, so dividing by `max(1)` gives zero
  // instead of a panic.

  pub fn average(&self) -> Duration {
    self.samples.iter().sum::<Duration>() / self.samples.len().max(1) as u32
  }

  pub fn max(&self) -> Duration { self.samples.iter().copied().max().unwrap_or_default() }

  /// Frames per second derived from the average frame time.
  pub fn fps(&self) -> f64 {
    let secs = self.average().as_secs_f64();
    if secs > 0.0 {
      1.0 / secs
    } else {
      0.0
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_sampler_averages_to_zero() {
    let sampler = FrameTimeSampler::new(4);
    assert_eq!(sampler.average(), Duration::ZERO);
    assert_eq!(sampler.max(), Duration::ZERO);
    assert_eq!(sampler.fps(), 0.0);
  }

  #[test]
  fn overwrites_oldest_samples() {
    let mut sampler = FrameTimeSampler::new(3);
    for ms in [10, 20, 30, 40, 50] {
      sampler.push(Duration::from_millis(ms));
    }
    assert_eq!(sampler.samples(), &[
      Duration::from_millis(40),
      Duration::from_millis(50),
      Duration::from_millis(30),
    ]);
    assert_eq!(sampler.average(), Duration::from_millis(40));
    assert_eq!(sampler.max(), Duration::from_millis(50));
  }

  #[test]
  fn fps_from_average() {
    let mut sampler = FrameTimeSampler::new(2);
    sampler.push(Duration::from_millis(20));
    sampler.push(Duration::from_millis(20));
    assert!((sampler.fps() - 50.0).abs() < 1e-9);
  }

  #[test]
  fn end_frame_without_begin_is_ignored() {
    let mut sampler = FrameTimeSampler::new(2);
    sampler.end_frame();
    assert!(sampler.samples().is_empty());
    sampler.begin_frame();
    sampler.end_frame();
    assert_eq!(sampler.samples().len(), 1);
  }

  #[test]
  fn zero_window_still_holds_one_sample() {
    let mut sampler = FrameTimeSampler::new(0);
    sampler.push(Duration::from_millis(1));
    sampler.push(Duration::from_millis(2));
    assert_eq!(sampler.samples(), &[Duration::from_millis(2)]);
  }
}
