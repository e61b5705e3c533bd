/// A contiguous, inclusive index range handed to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub left: usize,
    pub right: usize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn slice<'a>(&self, sequence: &'a [i32]) -> &'a [i32] {
        &sequence[self.left..=self.right]
    }
}

/// Degenerate counts (non-positive, or more workers than elements) fall back
/// to a single worker.
pub fn normalize_workers(requested: i64, len: usize) -> usize {
    if requested <= 0 || requested as u64 > len as u64 {
        1
    } else {
        requested as usize
    }
}

/// Splits `[0, len - 1]` into `workers` chunks of `len / workers` elements.
/// The last chunk absorbs the remainder.
pub fn chunks(len: usize, workers: usize) -> Vec<Chunk> {
    if len == 0 {
        return vec![];
    }
    let workers = normalize_workers(workers as i64, len);
    let size = len / workers;

    (0..workers)
        .map(|index| {
            let left = index * size;
            let right = if index == workers - 1 {
                len - 1
            } else {
                left + size - 1
            };
            Chunk { index, left, right }
        })
        .collect()
}
