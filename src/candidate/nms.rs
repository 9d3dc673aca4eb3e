//! Non-maximum suppression for corner candidates on a single level.

use crate::candidate::topk::Corner;

/// Keeps corners that are strict maxima of the response in their 3x3
/// neighbourhood.
///
/// Equal responses are resolved in raster order: the earlier corner survives.
pub(crate) fn suppress_non_maxima(corners: &[Corner], width: usize, height: usize) -> Vec<Corner> {
    if corners.is_empty() {
        return Vec::new();
    }
    let mut map = vec![f32::NEG_INFINITY; width * height];
    for c in corners {
        map[c.y * width + c.x] = c.response;
    }

    corners
        .iter()
        .copied()
        .filter(|c| {
            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = c.x as isize + dx;
                    let ny = c.y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                        continue;
                    }
                    let other = map[ny as usize * width + nx as usize];
                    let earlier = dy < 0 || (dy == 0 && dx < 0);
                    if other > c.response || (other == c.response && earlier) {
                        return false;
                    }
                }
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::suppress_non_maxima;
    use crate::candidate::topk::Corner;

    fn corner(x: usize, y: usize, response: f32) -> Corner {
        Corner {
            x,
            y,
            level: 0,
            response,
        }
    }

    #[test]
    fn adjacent_weaker_corner_is_suppressed() {
        let corners = [corner(4, 4, 2.0), corner(5, 4, 1.0), corner(8, 8, 0.5)];
        let kept = suppress_non_maxima(&corners, 10, 10);
        assert_eq!(kept, vec![corner(4, 4, 2.0), corner(8, 8, 0.5)]);
    }

    #[test]
    fn equal_neighbours_keep_the_first() {
        let corners = [corner(3, 3, 1.0), corner(4, 4, 1.0)];
        let kept = suppress_non_maxima(&corners, 10, 10);
        assert_eq!(kept, vec![corner(3, 3, 1.0)]);
    }
}
