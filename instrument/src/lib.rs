use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Builds a mountain of `size` elements peaking at index `peak`:
/// `0, 1, .., peak, peak - 1, peak - 2, ..`.
pub fn generate_mountain(size: usize, peak: usize) -> Vec<i32> {
    let mut heights = vec![0i32; size];
    for (i, slot) in heights.iter_mut().enumerate().take(peak) {
        *slot = i as i32;
    }
    if peak < size {
        heights[peak] = peak as i32;
    }
    let mut value = peak as i32 - 1;
    for slot in heights.iter_mut().skip(peak + 1) {
        *slot = value;
        value -= 1;
    }
    heights
}

/// Read side of [`capture`].
pub struct Captured<R> {
    slot: Rc<RefCell<Option<R>>>,
}

impl<R: Clone> Captured<R> {
    /// The value returned by the most recent call, if any.
    pub fn last(&self) -> Option<R> {
        self.slot.borrow().clone()
    }
}

/// Wraps `func` so every call also records its return value.
pub fn capture<F, R>(mut func: F) -> (impl FnMut() -> R, Captured<R>)
where
    F: FnMut() -> R,
    R: Clone,
{
    let slot = Rc::new(RefCell::new(None));
    let captured = Captured { slot: slot.clone() };
    let wrapped = move || {
        let value = func();
        *slot.borrow_mut() = Some(value.clone());
        value
    };
    (wrapped, captured)
}

/// Total wall time of `repeat` back-to-back calls.
pub fn time_repeated<F: FnMut()>(repeat: u32, mut func: F) -> Duration {
    let begin = Instant::now();
    for _ in 0..repeat {
        func();
    }
    begin.elapsed()
}

pub fn report_line<A: Display>(elapsed: Duration, label: &str, size: usize, answer: A) -> String {
    format!(
        "elapsed time = {:.6}  {} array size={} ans={}",
        elapsed.as_secs_f64(),
        label,
        size,
        answer
    )
}
