// Indexed strip / fan / list draw calls -> triangles.

use dts_shape::{DrawMode, PrimitiveFlags};

use crate::error::PrimitiveError;

/// Lazy triangle stream over one primitive's element range.
///
/// Strips and fans flip winding on every other triangle so that all faces
/// of the primitive keep the engine's facing.
#[derive(Clone, Debug)]
pub struct Triangles<'a> {
    indices: &'a [u32],
    mode: DrawMode,
    pivot: u32,
    next: usize,
    end: usize,
    even: bool,
}

impl Iterator for Triangles<'_> {
    type Item = [u32; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let i = self.next;
        let idx = self.indices;

        let tri = match self.mode {
            DrawMode::Triangles => {
                self.next += 3;
                return Some([idx[i], idx[i - 1], idx[i - 2]]);
            }
            DrawMode::Strip if self.even => [idx[i], idx[i - 1], idx[i - 2]],
            DrawMode::Strip => [idx[i - 2], idx[i - 1], idx[i]],
            DrawMode::Fan if self.even => [idx[i], idx[i - 1], self.pivot],
            DrawMode::Fan => [self.pivot, idx[i - 1], idx[i]],
        };
        self.next += 1;
        self.even = !self.even;
        Some(tri)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next);
        let n = match self.mode {
            DrawMode::Triangles => remaining.div_ceil(3),
            DrawMode::Strip | DrawMode::Fan => remaining,
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Triangles<'_> {}

/// Decode the primitive `ty` covering `count` elements of `indices` starting at `first`.
pub fn decode(
    ty: u32,
    first: usize,
    count: usize,
    indices: &[u32],
) -> Result<Triangles<'_>, PrimitiveError> {
    let flags = PrimitiveFlags::from_bits_retain(ty);
    if !flags.contains(PrimitiveFlags::INDEXED) {
        return Err(PrimitiveError::NotIndexed { ty });
    }

    let end = first.saturating_add(count);
    if end > indices.len() {
        return Err(PrimitiveError::OutOfBounds {
            first,
            end,
            len: indices.len(),
        });
    }

    // A fan pivots on its first element; an empty range never reads it.
    let pivot = indices.get(first).copied().unwrap_or_default();

    Ok(Triangles {
        indices,
        mode: flags.draw_mode(),
        pivot,
        next: first + 2,
        end,
        even: true,
    })
}
